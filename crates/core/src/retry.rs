//! 重试/死信路由
//!
//! 纯函数：根据失败投递的消息头和重试策略决定重新入队还是进入死信交换机。
//! 不做任何I/O，发布由调用方负责。

use crate::models::{HeaderValue, Headers};

/// 携带重试次数的消息头
pub const RETRY_HEADER: &str = "x-retry";

/// 重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 新的重试次数达到该值时进入死信交换机
    pub max_retry: u32,
}

/// 失败投递的路由决策
#[derive(Debug, Clone, PartialEq)]
pub enum RetryDecision {
    /// 以递增后的 `x-retry` 重新发布到主交换机
    Requeue { headers: Headers },
    /// 发布到死信交换机，`x-retry` 保留为升级时的值
    DeadLetter { headers: Headers },
}

impl RetryDecision {
    pub fn headers(&self) -> &Headers {
        match self {
            RetryDecision::Requeue { headers } | RetryDecision::DeadLetter { headers } => headers,
        }
    }

    pub fn retry_count(&self) -> u32 {
        retry_count(self.headers())
    }

    pub fn is_dead_letter(&self) -> bool {
        matches!(self, RetryDecision::DeadLetter { .. })
    }
}

impl RetryPolicy {
    pub fn new(max_retry: u32) -> Self {
        Self { max_retry }
    }

    /// 为一次失败的投递生成路由决策
    pub fn decide(&self, headers: &Headers) -> RetryDecision {
        let retry_count = retry_count(headers).saturating_add(1);

        let mut new_headers = Headers::new();
        new_headers.insert(
            RETRY_HEADER.to_string(),
            HeaderValue::Integer(i64::from(retry_count)),
        );

        if retry_count >= self.max_retry {
            RetryDecision::DeadLetter {
                headers: new_headers,
            }
        } else {
            RetryDecision::Requeue {
                headers: new_headers,
            }
        }
    }
}

/// 读取 `x-retry`
///
/// 缺失或无法解析为非负整数时返回0。
pub fn retry_count(headers: &Headers) -> u32 {
    headers.get(RETRY_HEADER).map(parse_retry_value).unwrap_or(0)
}

fn parse_retry_value(value: &HeaderValue) -> u32 {
    match value {
        HeaderValue::Integer(v) if *v >= 0 => u32::try_from(*v).unwrap_or(u32::MAX),
        HeaderValue::Text(s) => s.parse::<u32>().unwrap_or(0),
        HeaderValue::Float(v) if v.is_finite() && *v >= 0.0 && v.fract() == 0.0 => {
            if *v >= f64::from(u32::MAX) {
                u32::MAX
            } else {
                *v as u32
            }
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(value: HeaderValue) -> Headers {
        let mut headers = Headers::new();
        headers.insert(RETRY_HEADER.to_string(), value);
        headers
    }

    #[test]
    fn test_retry_count_missing_header() {
        assert_eq!(retry_count(&Headers::new()), 0);
    }

    #[test]
    fn test_retry_count_parses_supported_values() {
        assert_eq!(retry_count(&headers_with(HeaderValue::Integer(4))), 4);
        assert_eq!(retry_count(&headers_with(HeaderValue::from("2"))), 2);
        assert_eq!(retry_count(&headers_with(HeaderValue::Float(3.0))), 3);
    }

    #[test]
    fn test_retry_count_defaults_malformed_values_to_zero() {
        assert_eq!(retry_count(&headers_with(HeaderValue::from("abc"))), 0);
        assert_eq!(retry_count(&headers_with(HeaderValue::from(" 2 "))), 0);
        assert_eq!(retry_count(&headers_with(HeaderValue::from("-1"))), 0);
        assert_eq!(retry_count(&headers_with(HeaderValue::Integer(-3))), 0);
        assert_eq!(retry_count(&headers_with(HeaderValue::Float(2.5))), 0);
        assert_eq!(retry_count(&headers_with(HeaderValue::Float(f64::NAN))), 0);
        assert_eq!(retry_count(&headers_with(HeaderValue::Bool(true))), 0);
        assert_eq!(retry_count(&headers_with(HeaderValue::Unsupported)), 0);
    }

    #[test]
    fn test_retry_count_clamps_large_values() {
        assert_eq!(
            retry_count(&headers_with(HeaderValue::Integer(i64::MAX))),
            u32::MAX
        );
    }

    // maxRetry=3，无 x-retry
    #[test]
    fn test_first_failure_requeues() {
        let decision = RetryPolicy::new(3).decide(&Headers::new());

        assert!(matches!(decision, RetryDecision::Requeue { .. }));
        assert_eq!(decision.retry_count(), 1);
    }

    // maxRetry=3，x-retry=2
    #[test]
    fn test_last_failure_dead_letters() {
        let decision = RetryPolicy::new(3).decide(&headers_with(HeaderValue::Integer(2)));

        assert!(decision.is_dead_letter());
        assert_eq!(decision.retry_count(), 3);
    }

    // maxRetry=1，无 x-retry
    #[test]
    fn test_max_retry_one_dead_letters_immediately() {
        let decision = RetryPolicy::new(1).decide(&Headers::new());

        assert!(decision.is_dead_letter());
        assert_eq!(decision.retry_count(), 1);
    }

    #[test]
    fn test_max_retry_zero_dead_letters_immediately() {
        let decision = RetryPolicy::new(0).decide(&Headers::new());

        assert!(decision.is_dead_letter());
        assert_eq!(decision.retry_count(), 1);
    }

    #[test]
    fn test_decision_boundary_for_all_counts() {
        let policy = RetryPolicy::new(5);
        for current in 0..10u32 {
            let decision = policy.decide(&headers_with(HeaderValue::from(current)));
            assert_eq!(decision.retry_count(), current + 1);
            assert_eq!(decision.is_dead_letter(), current + 1 >= 5, "current={current}");
        }
    }

    #[test]
    fn test_malformed_header_behaves_like_zero() {
        let policy = RetryPolicy::new(3);
        let malformed = policy.decide(&headers_with(HeaderValue::from("not-a-number")));
        let missing = policy.decide(&Headers::new());

        assert_eq!(malformed, missing);
    }

    #[test]
    fn test_decide_is_idempotent() {
        let policy = RetryPolicy::new(3);
        let headers = headers_with(HeaderValue::Integer(1));

        let first = policy.decide(&headers);
        let second = policy.decide(&headers);

        assert_eq!(first, second);
        assert_eq!(retry_count(&headers), 1);
    }

    #[test]
    fn test_new_headers_only_carry_retry_counter() {
        let mut headers = headers_with(HeaderValue::Integer(0));
        headers.insert("x-trace".to_string(), HeaderValue::from("abc"));

        let decision = RetryPolicy::new(3).decide(&headers);

        assert_eq!(decision.headers().len(), 1);
        assert_eq!(
            decision.headers().get(RETRY_HEADER),
            Some(&HeaderValue::Integer(1))
        );
    }

    #[test]
    fn test_saturating_increment() {
        let decision = RetryPolicy::new(3).decide(&headers_with(HeaderValue::Integer(i64::MAX)));

        assert!(decision.is_dead_letter());
        assert_eq!(decision.retry_count(), u32::MAX);
    }
}
