//! Rendering of decoded cell values to the text the exporters work with.
use calamine::{Data, ExcelDateTime};
use chrono::NaiveDateTime;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Precision Excel displays numbers with.
const SIGNIFICANT_DIGITS: usize = 15;

/// Convert 0-based row & column indexes to an Excel-style cell position.
///
/// # Arguments
///
/// * `row` - The 0-based row index
/// * `column` - The 0-based column index
///
/// # Returns
///
/// * `String` - Excel-style cell position in upper case, e.g. `B3`
pub fn cell_position(row: usize, column: usize) -> String {
    let mut column = column + 1;
    let mut position = String::new();
    while column > 0 {
        column -= 1;
        position.insert(0, char::from(b'A' + (column % 26) as u8));
        column /= 26;
    }
    position.push_str(&(row + 1).to_string());
    position
}

/// Renders a cell value as text.
///
/// All values pass through as text: numbers are shown the way Excel displays
/// them (integral values without a fraction, at most 15 significant digits),
/// serial dates are formatted as ISO date, time or datetime depending on
/// which parts they carry, and error cells keep their error literal.
pub fn render(value: &Data) -> String {
    match value {
        Data::Empty => String::new(),
        Data::String(value) => value.to_owned(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) => render_number(*value),
        Data::Bool(value) => value.to_string(),
        Data::DateTime(value) => render_datetime(value),
        Data::DateTimeIso(value) => value.to_owned(),
        Data::DurationIso(value) => value.to_owned(),
        Data::Error(error) => error.to_string(),
    }
}

fn render_datetime(value: &ExcelDateTime) -> String {
    let serial = value.as_f64();
    if value.is_duration() {
        return render_number(serial);
    }
    match value.as_datetime() {
        Some(datetime) => format_datetime(&datetime, serial),
        None => render_number(serial),
    }
}

/// Formats a number in its shortest form, rounded to 15 significant digits
/// when it carries more.
///
/// Rounded values switch to exponent notation (`1.23456789012346E+17`) when
/// the exponent is below -4 or at least 15.
pub fn render_number(value: f64) -> String {
    let shortest = value.to_string();
    if significant_digits(&shortest) <= SIGNIFICANT_DIGITS {
        return shortest;
    }

    let scientific = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return shortest;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return shortest;
    };
    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}E{sign}{:02}", trim_fraction(mantissa), exponent.abs())
    } else {
        let decimals = (SIGNIFICANT_DIGITS as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_owned()
    }
}

fn significant_digits(number: &str) -> usize {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    digits.trim_start_matches('0').trim_end_matches('0').len()
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

fn format_datetime(datetime: &NaiveDateTime, serial: f64) -> String {
    // Serial values within the first day carry only a time of day
    let format = if serial < 1.0 {
        TIME_FORMAT
    } else if serial.fract() == 0.0 {
        DATE_FORMAT
    } else {
        DATETIME_FORMAT
    };
    datetime.format(format).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{CellErrorType, ExcelDateTimeType};

    #[test]
    fn positions_use_excel_letters() {
        assert_eq!(cell_position(0, 0), "A1");
        assert_eq!(cell_position(4, 1), "B5");
        assert_eq!(cell_position(0, 25), "Z1");
        assert_eq!(cell_position(9, 26), "AA10");
        assert_eq!(cell_position(0, 52), "BA1");
    }

    #[test]
    fn numbers_render_without_trailing_zero() {
        assert_eq!(render(&Data::Float(1.0)), "1");
        assert_eq!(render(&Data::Float(2.5)), "2.5");
        assert_eq!(render(&Data::Int(-3)), "-3");
    }

    #[test]
    fn numbers_round_to_displayed_precision() {
        assert_eq!(render(&Data::Float(0.1 + 0.2)), "0.3");
        assert_eq!(render(&Data::Float(1.0 / 3.0)), "0.333333333333333");
        assert_eq!(render(&Data::Float(-2.0 / 3.0)), "-0.666666666666667");
        assert_eq!(render(&Data::Float(123456789.123456789)), "123456789.123457");
        assert_eq!(render(&Data::Float(123456789012345678.0)), "1.23456789012346E+17");
        assert_eq!(render(&Data::Float(1e-7 / 3.0)), "3.33333333333333E-08");
    }

    #[test]
    fn short_numbers_keep_their_shortest_form() {
        assert_eq!(render(&Data::Float(1e21)), "1000000000000000000000");
        assert_eq!(render(&Data::Float(0.000125)), "0.000125");
        assert_eq!(render(&Data::Float(12345.6789)), "12345.6789");
    }

    #[test]
    fn text_and_flags_pass_through() {
        assert_eq!(render(&Data::Empty), "");
        assert_eq!(render(&Data::String("(1,2);(3,4)".to_owned())), "(1,2);(3,4)");
        assert_eq!(render(&Data::Bool(false)), "false");
        assert_eq!(render(&Data::Error(CellErrorType::Div0)), "#DIV/0!");
    }

    #[test]
    fn serial_dates_render_as_iso_text() {
        let date = ExcelDateTime::new(45292.0, ExcelDateTimeType::DateTime, false);
        assert_eq!(render(&Data::DateTime(date)), "2024-01-01");

        let datetime = ExcelDateTime::new(45292.5, ExcelDateTimeType::DateTime, false);
        assert_eq!(render(&Data::DateTime(datetime)), "2024-01-01 12:00:00");

        let time = ExcelDateTime::new(0.25, ExcelDateTimeType::DateTime, false);
        assert_eq!(render(&Data::DateTime(time)), "06:00:00");
    }
}
