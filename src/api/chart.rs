use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::js_literal::{JsLiteralFormat, quote_string, render_js_literal};
use crate::core::validators::validate_variable_name;
use crate::core::{
    CallbackFunction, ConfigObject, CopyPolicy, JsCall, JsObject, JsValue, copy_tree,
    parse_js_call, parse_js_literal,
};
use crate::error::{ChartError, ChartResult};
use crate::options::{Options, Series};

/// Highcharts constructor used to instantiate the chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartConstructor {
    #[default]
    Chart,
    StockChart,
    MapChart,
    GanttChart,
}

impl ChartConstructor {
    /// Name of the `Highcharts.*` factory, also the export server `constr` value.
    #[must_use]
    pub const fn js_name(self) -> &'static str {
        match self {
            Self::Chart => "chart",
            Self::StockChart => "stockChart",
            Self::MapChart => "mapChart",
            Self::GanttChart => "ganttChart",
        }
    }

    /// Accepts the factory name (`stockChart`) or the type name (`StockChart`).
    pub fn from_js_name(name: &str) -> ChartResult<Self> {
        match name {
            "chart" | "Chart" => Ok(Self::Chart),
            "stockChart" | "StockChart" => Ok(Self::StockChart),
            "mapChart" | "MapChart" => Ok(Self::MapChart),
            "ganttChart" | "GanttChart" => Ok(Self::GanttChart),
            other => Err(ChartError::InvalidData(format!(
                "unknown chart constructor `{other}`"
            ))),
        }
    }
}

/// A chart bound to an HTML container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chart {
    container: Option<String>,
    variable_name: Option<String>,
    callback: Option<CallbackFunction>,
    options: Option<Options>,
    constructor: ChartConstructor,
}

impl Chart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_options(options: Options) -> Self {
        Self {
            options: Some(options),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.container = Some(container.into());
        self
    }

    pub fn with_variable_name(mut self, variable_name: impl Into<String>) -> ChartResult<Self> {
        let variable_name = variable_name.into();
        validate_variable_name("variable_name", &variable_name)?;
        self.variable_name = Some(variable_name);
        Ok(self)
    }

    #[must_use]
    pub fn with_callback(mut self, callback: CallbackFunction) -> Self {
        self.callback = Some(callback);
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    #[must_use]
    pub fn with_constructor(mut self, constructor: ChartConstructor) -> Self {
        self.constructor = constructor;
        self
    }

    #[must_use]
    pub fn container(&self) -> Option<&str> {
        self.container.as_deref()
    }

    #[must_use]
    pub fn variable_name(&self) -> Option<&str> {
        self.variable_name.as_deref()
    }

    #[must_use]
    pub fn callback(&self) -> Option<&CallbackFunction> {
        self.callback.as_ref()
    }

    #[must_use]
    pub fn options(&self) -> Option<&Options> {
        self.options.as_ref()
    }

    pub fn options_mut(&mut self) -> &mut Options {
        self.options.get_or_insert_with(Options::default)
    }

    #[must_use]
    pub fn constructor(&self) -> ChartConstructor {
        self.constructor
    }

    pub fn add_series(&mut self, series: Series) {
        self.options_mut().add_series(series);
    }

    pub fn validate(&self) -> ChartResult<()> {
        if let Some(variable_name) = &self.variable_name {
            validate_variable_name("variable_name", variable_name)?;
        }
        if let Some(callback) = &self.callback {
            callback.validate()?;
        }
        if let Some(options) = &self.options {
            options.validate()?;
        }
        Ok(())
    }

    fn render_to(&self) -> Option<&str> {
        self.options
            .as_ref()
            .and_then(|options| options.chart.as_ref())
            .and_then(|chart| chart.render_to.as_deref())
    }

    /// Renders `var name = Highcharts.chart('container', {...}, callback);`.
    pub fn to_js_literal(&self) -> ChartResult<String> {
        self.to_js_literal_with(JsLiteralFormat::from_env())
    }

    pub fn to_js_literal_with(&self, format: JsLiteralFormat) -> ChartResult<String> {
        self.validate()?;
        if self.container.is_none() && self.render_to().is_none() {
            return Err(ChartError::invalid_value(
                "container",
                "a container or chart.renderTo is required",
            ));
        }

        let mut arguments = Vec::with_capacity(3);
        if let Some(container) = &self.container {
            arguments.push(quote_string(container));
        }
        let options = match &self.options {
            Some(options) => options.to_js_value()?,
            None => JsValue::object(),
        };
        arguments.push(render_js_literal(&options, format));
        if let Some(callback) = &self.callback {
            arguments.push(render_js_literal(&JsValue::Function(callback.clone()), format));
        }

        let call = format!(
            "Highcharts.{}({})",
            self.constructor.js_name(),
            arguments.join(", ")
        );
        let literal = match &self.variable_name {
            Some(name) => format!("var {name} = {call};"),
            None => format!("{call};"),
        };
        trace!(
            constructor = self.constructor.js_name(),
            bytes = literal.len(),
            "rendered chart"
        );
        Ok(literal)
    }

    /// Parses a chart from a constructor call or from a plain object literal
    /// with `container`, `options`, `variableName` and `callback` keys.
    pub fn from_js_literal(input: &str) -> ChartResult<Self> {
        let chart = match parse_js_call(input) {
            Ok(call) => Self::from_js_call(call)?,
            Err(call_error) => match parse_js_literal(input) {
                Ok(JsValue::Object(members)) => Self::from_members(members)?,
                Ok(_) => {
                    return Err(ChartError::InvalidData(
                        "a chart literal must be an object".to_owned(),
                    ));
                }
                Err(literal_error) => {
                    return Err(if input.contains("Highcharts.") {
                        call_error
                    } else {
                        literal_error
                    });
                }
            },
        };
        chart.validate()?;
        debug!(
            constructor = chart.constructor.js_name(),
            container = chart.container.as_deref().unwrap_or(""),
            "parsed chart"
        );
        Ok(chart)
    }

    fn from_js_call(call: JsCall) -> ChartResult<Self> {
        let constructor_name = call.callee.strip_prefix("Highcharts.").ok_or_else(|| {
            ChartError::InvalidData(format!(
                "expected a `Highcharts.*` constructor, found `{}`",
                call.callee
            ))
        })?;

        let mut chart = Self {
            constructor: ChartConstructor::from_js_name(constructor_name)?,
            variable_name: call.variable_name,
            ..Self::default()
        };
        let mut arguments = call.arguments.into_iter().peekable();
        if let Some(JsValue::String(_)) = arguments.peek() {
            if let Some(JsValue::String(container)) = arguments.next() {
                chart.container = Some(container);
            }
        }
        match arguments.next() {
            Some(options @ JsValue::Object(_)) => {
                chart.options = Some(Options::from_js_value(options)?);
            }
            Some(other) => {
                return Err(ChartError::InvalidData(format!(
                    "expected chart options, found {}",
                    describe(&other)
                )));
            }
            None => {}
        }
        match arguments.next() {
            Some(JsValue::Function(callback)) => chart.callback = Some(callback),
            Some(JsValue::Null) | None => {}
            Some(other) => {
                return Err(ChartError::InvalidData(format!(
                    "expected a callback function, found {}",
                    describe(&other)
                )));
            }
        }
        if arguments.next().is_some() {
            return Err(ChartError::InvalidData(
                "too many arguments to the chart constructor".to_owned(),
            ));
        }
        Ok(chart)
    }

    fn from_members(mut members: JsObject) -> ChartResult<Self> {
        let mut take = |keys: &[&str]| keys.iter().find_map(|key| members.shift_remove(*key));

        let container = take(&["container", "renderTo"]);
        let options = take(&["options", "userOptions"]);
        let variable_name = take(&["variableName", "variable_name"]);
        let callback = take(&["callback"]);
        let constructor = take(&["constructor"]);

        let mut chart = Self::default();
        match container {
            Some(JsValue::String(container)) => chart.container = Some(container),
            Some(JsValue::Null) | None => {}
            Some(other) => return Err(unexpected("container", &other)),
        }
        match options {
            Some(options @ JsValue::Object(_)) => {
                chart.options = Some(Options::from_js_value(options)?);
            }
            Some(JsValue::Null) | None => {}
            Some(other) => return Err(unexpected("options", &other)),
        }
        match variable_name {
            Some(JsValue::String(name)) => chart.variable_name = Some(name),
            Some(JsValue::Null) | None => {}
            Some(other) => return Err(unexpected("variableName", &other)),
        }
        match callback {
            Some(JsValue::Function(callback)) => chart.callback = Some(callback),
            Some(JsValue::String(source)) => chart.callback = Some(source.parse()?),
            Some(JsValue::Null) | None => {}
            Some(other) => return Err(unexpected("callback", &other)),
        }
        match constructor {
            Some(JsValue::String(name)) => {
                chart.constructor = ChartConstructor::from_js_name(&name)?;
            }
            Some(JsValue::Null) | None => {}
            Some(other) => return Err(unexpected("constructor", &other)),
        }
        if let Some(key) = members.keys().next() {
            return Err(ChartError::InvalidData(format!(
                "unknown chart key `{key}`"
            )));
        }
        Ok(chart)
    }

    /// Options as JSON, the payload `Highcharts.chart` receives.
    pub fn to_json(&self) -> ChartResult<String> {
        match &self.options {
            Some(options) => options.to_json(),
            None => Ok("{}".to_owned()),
        }
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        match &self.options {
            Some(options) => options.to_json_pretty(),
            None => Ok("{}".to_owned()),
        }
    }

    pub fn from_json(input: &str) -> ChartResult<Self> {
        Ok(Self::from_options(Options::from_json(input)?))
    }

    /// Copies this chart's configuration into `other` and returns the result.
    ///
    /// `other` keeps its container, variable name and constructor. Its data
    /// survives when `policy.preserve_data` is set.
    pub fn copy(&self, other: &Chart, policy: CopyPolicy) -> ChartResult<Chart> {
        let source = match &self.options {
            Some(options) => options.to_js_value()?,
            None => JsValue::object(),
        };
        let target = match &other.options {
            Some(options) => options.to_js_value()?,
            None => JsValue::object(),
        };
        let merged = copy_tree(&source, &target, policy);

        let mut copied = other.clone();
        copied.options = Some(Options::from_js_value(merged)?);
        if copied.callback.is_none() || policy.overwrite {
            if let Some(callback) = &self.callback {
                copied.callback = Some(callback.clone());
            }
        }
        debug!(
            overwrite = policy.overwrite,
            preserve_data = policy.preserve_data,
            "copied chart configuration"
        );
        Ok(copied)
    }

    /// Copies this chart into an empty chart with the default policy.
    ///
    /// Series come across whole; a top-level `data` section does not.
    pub fn copy_into_new(&self) -> ChartResult<Chart> {
        let mut copied = self.copy(&Chart::new(), CopyPolicy::default())?;
        copied.container = self.container.clone();
        copied.variable_name = self.variable_name.clone();
        copied.constructor = self.constructor;
        Ok(copied)
    }

    /// Renders the chart through an export server.
    ///
    /// The chart's options, constructor and callback replace those of
    /// `request`. Without `server`, one configured from the environment is used.
    #[cfg(feature = "export-server")]
    pub fn download_chart(
        &self,
        request: crate::export::ExportRequest,
        server: Option<&crate::export::ExportServer>,
    ) -> ChartResult<crate::export::ExportedChart> {
        use crate::export::{ExportServer, ExportServerConfig};

        let mut request = request
            .with_options(self.options.clone().unwrap_or_default())
            .with_constructor(self.constructor);
        if request.callback.is_none() {
            request.callback = self.callback.clone();
        }
        match server {
            Some(server) => server.request_chart(&request),
            None => ExportServer::new(ExportServerConfig::from_env())?.request_chart(&request),
        }
    }
}

fn describe(value: &JsValue) -> &'static str {
    match value {
        JsValue::Null => "null",
        JsValue::Bool(_) => "a boolean",
        JsValue::Number(_) => "a number",
        JsValue::String(_) => "a string",
        JsValue::Array(_) => "an array",
        JsValue::Object(_) => "an object",
        JsValue::Function(_) => "a function",
        JsValue::Class(_) => "a class",
    }
}

fn unexpected(key: &str, value: &JsValue) -> ChartError {
    ChartError::InvalidData(format!("chart key `{key}` cannot be {}", describe(value)))
}
