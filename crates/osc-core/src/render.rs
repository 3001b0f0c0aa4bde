//! Textual rendering of decoded OSC values.
//!
//! Each value is shown in its natural form, so an `int32` 42 renders as `42`
//! while a `float32` 3.14 renders as `3.14`.  A message's values are joined with
//! `", "` in arrival order to produce [`ReceivedMessage::values`].
//!
//! [`ReceivedMessage::values`]: crate::ReceivedMessage

use rosc::OscType;

/// Renders a single decoded value.
pub fn render_value(value: &OscType) -> String {
    match value {
        OscType::Int(v) => v.to_string(),
        OscType::Long(v) => v.to_string(),
        OscType::Float(v) => v.to_string(),
        OscType::Double(v) => v.to_string(),
        OscType::String(v) => v.clone(),
        OscType::Bool(v) => v.to_string(),
        OscType::Char(v) => v.to_string(),
        OscType::Blob(bytes) => format!("{bytes:?}"),
        OscType::Nil => "nil".to_string(),
        OscType::Inf => "inf".to_string(),
        OscType::Time(t) => format!("time({}, {})", t.seconds, t.fractional),
        OscType::Color(c) => format!("rgba({}, {}, {}, {})", c.red, c.green, c.blue, c.alpha),
        OscType::Midi(m) => format!("midi({}, {}, {}, {})", m.port, m.status, m.data1, m.data2),
        OscType::Array(array) => format!("[{}]", render_values(&array.content)),
    }
}

/// Renders every value and joins them with `", "`.
pub fn render_values(values: &[OscType]) -> String {
    values
        .iter()
        .map(render_value)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosc::{OscArray, OscColor, OscTime};

    #[test]
    fn test_int_and_float_render_differently() {
        assert_eq!(render_value(&OscType::Int(42)), "42");
        assert_eq!(render_value(&OscType::Float(3.14)), "3.14");
        assert_eq!(render_value(&OscType::Float(1.0)), "1");
    }

    #[test]
    fn test_scalars_render_naturally() {
        assert_eq!(render_value(&OscType::String("hi there".into())), "hi there");
        assert_eq!(render_value(&OscType::Bool(true)), "true");
        assert_eq!(render_value(&OscType::Long(-9)), "-9");
        assert_eq!(render_value(&OscType::Double(0.25)), "0.25");
        assert_eq!(render_value(&OscType::Char('x')), "x");
        assert_eq!(render_value(&OscType::Nil), "nil");
        assert_eq!(render_value(&OscType::Inf), "inf");
    }

    #[test]
    fn test_compound_values_render_bracketed() {
        assert_eq!(render_value(&OscType::Blob(vec![1, 2, 3])), "[1, 2, 3]");
        let array = OscType::Array(OscArray {
            content: vec![OscType::Int(1), OscType::String("a".into())],
        });
        assert_eq!(render_value(&array), "[1, a]");
    }

    #[test]
    fn test_time_and_color_render_with_fields() {
        let time = OscType::Time(OscTime {
            seconds: 10,
            fractional: 5,
        });
        assert_eq!(render_value(&time), "time(10, 5)");

        let color = OscType::Color(OscColor {
            red: 1,
            green: 2,
            blue: 3,
            alpha: 255,
        });
        assert_eq!(render_value(&color), "rgba(1, 2, 3, 255)");
    }

    #[test]
    fn test_render_values_joins_with_comma_space() {
        let values = vec![
            OscType::Int(42),
            OscType::Float(3.14),
            OscType::String("x".into()),
        ];
        assert_eq!(render_values(&values), "42, 3.14, x");
    }

    #[test]
    fn test_render_values_of_nothing_is_empty() {
        assert_eq!(render_values(&[]), "");
    }
}
