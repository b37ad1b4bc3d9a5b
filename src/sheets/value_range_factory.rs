use google_sheets4::api::ValueRange;
use serde_json::Value;

pub trait ValueRangeFactory {
    fn from_str<T: AsRef<str>>(s: T) -> Self;
}

impl ValueRangeFactory for ValueRange {
    fn from_str<T: AsRef<str>>(s: T) -> Self {
        ValueRange {
            major_dimension: None,
            range: None,
            values: Some(vec![vec![Value::String(s.as_ref().to_owned())]]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_single_cell() {
        let value_range = ValueRange::from_str("85 EGP");
        assert_eq!(value_range.major_dimension, None);
        assert_eq!(
            value_range.values,
            Some(vec![vec![Value::String("85 EGP".to_string())]])
        );
    }
}
