//! AMQP字段表与消息头之间的转换

use assignment_consumer_core::{HeaderValue, Headers};
use lapin::types::{AMQPValue, FieldTable, LongString, ShortString};

/// 将AMQP字段表转换为消息头
pub fn to_headers(table: &FieldTable) -> Headers {
    table
        .inner()
        .iter()
        .map(|(key, value)| (key.as_str().to_string(), to_header_value(value)))
        .collect()
}

/// 将消息头转换为AMQP字段表
pub fn to_field_table(headers: &Headers) -> FieldTable {
    let mut table = FieldTable::default();
    for (key, value) in headers {
        table.insert(ShortString::from(key.clone()), to_amqp_value(value));
    }
    table
}

fn to_header_value(value: &AMQPValue) -> HeaderValue {
    match value {
        AMQPValue::ShortShortInt(v) => HeaderValue::Integer(i64::from(*v)),
        AMQPValue::ShortShortUInt(v) => HeaderValue::Integer(i64::from(*v)),
        AMQPValue::ShortInt(v) => HeaderValue::Integer(i64::from(*v)),
        AMQPValue::ShortUInt(v) => HeaderValue::Integer(i64::from(*v)),
        AMQPValue::LongInt(v) => HeaderValue::Integer(i64::from(*v)),
        AMQPValue::LongUInt(v) => HeaderValue::Integer(i64::from(*v)),
        AMQPValue::LongLongInt(v) => HeaderValue::Integer(*v),
        AMQPValue::Float(v) => HeaderValue::Float(f64::from(*v)),
        AMQPValue::Double(v) => HeaderValue::Float(*v),
        AMQPValue::ShortString(v) => HeaderValue::Text(v.as_str().to_string()),
        AMQPValue::LongString(v) => {
            HeaderValue::Text(String::from_utf8_lossy(v.as_bytes()).into_owned())
        }
        AMQPValue::Boolean(v) => HeaderValue::Bool(*v),
        _ => HeaderValue::Unsupported,
    }
}

fn to_amqp_value(value: &HeaderValue) -> AMQPValue {
    match value {
        HeaderValue::Integer(v) => AMQPValue::LongLongInt(*v),
        HeaderValue::Float(v) => AMQPValue::Double(*v),
        HeaderValue::Text(v) => AMQPValue::LongString(LongString::from(v.clone())),
        HeaderValue::Bool(v) => AMQPValue::Boolean(*v),
        HeaderValue::Unsupported => AMQPValue::Void,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assignment_consumer_core::{retry_count, RETRY_HEADER};

    fn table_with(value: AMQPValue) -> FieldTable {
        let mut table = FieldTable::default();
        table.insert(ShortString::from(RETRY_HEADER.to_string()), value);
        table
    }

    #[test]
    fn test_integer_variants_map_to_integer() {
        let cases = [
            AMQPValue::ShortShortUInt(2),
            AMQPValue::ShortInt(2),
            AMQPValue::LongInt(2),
            AMQPValue::LongUInt(2),
            AMQPValue::LongLongInt(2),
        ];
        for value in cases {
            let headers = to_headers(&table_with(value));
            assert_eq!(headers.get(RETRY_HEADER), Some(&HeaderValue::Integer(2)));
        }
    }

    #[test]
    fn test_string_header_is_parsed_as_retry_count() {
        let headers = to_headers(&table_with(AMQPValue::LongString(LongString::from(
            "4".to_string(),
        ))));

        assert_eq!(headers.get(RETRY_HEADER), Some(&HeaderValue::from("4")));
        assert_eq!(retry_count(&headers), 4);
    }

    #[test]
    fn test_unsupported_values() {
        let headers = to_headers(&table_with(AMQPValue::Void));
        assert_eq!(headers.get(RETRY_HEADER), Some(&HeaderValue::Unsupported));
        assert_eq!(retry_count(&headers), 0);
    }

    #[test]
    fn test_outbound_headers_convert_back() {
        let mut headers = Headers::new();
        headers.insert(RETRY_HEADER.to_string(), HeaderValue::Integer(3));
        headers.insert("x-source".to_string(), HeaderValue::from("gateway"));

        let table = to_field_table(&headers);

        assert_eq!(to_headers(&table), headers);
    }
}
