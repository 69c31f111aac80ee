use approx::assert_relative_eq;
use chrono::{TimeZone, Utc};
use highcharts_rs::core::primitives::{datetime_to_epoch_millis, decimal_to_f64};
use highcharts_rs::core::{ConfigObject, JsValue};
use highcharts_rs::options::{DataPoint, Options, Series, SeriesType};
use rust_decimal::Decimal;
use std::str::FromStr;

#[test]
fn datetimes_become_millisecond_timestamps() {
    let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("valid time");
    assert_relative_eq!(datetime_to_epoch_millis(time), 1_704_067_200_000.0);
    assert_eq!(JsValue::from(time), JsValue::number(1_704_067_200_000.0));
}

#[test]
fn decimals_convert_to_numbers() {
    let price = Decimal::from_str("1234.5678").expect("decimal");
    assert_relative_eq!(decimal_to_f64(price, "price").expect("to f64"), 1234.5678);

    let value = JsValue::try_from(price).expect("decimal value");
    assert_relative_eq!(value.as_f64().expect("number"), 1234.5678);
}

#[test]
fn datetime_points_render_as_timestamps() {
    let time = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single().expect("valid time");
    let options = Options::new().with_series(
        Series::new(SeriesType::Line).with_data([DataPoint::xy(time, 21.5)]),
    );
    let literal = options.to_js_literal().expect("render");
    assert!(literal.contains("[1709294400000, 21.5]"));
}
