//! JSON requests understood by `capinhas-eval`

use anyhow::{Context, Result};
use capinhas_core::{format_brl, parse_brl, Config, Money};
use chrono::{DateTime, Utc};
use incentives::{
    resolve_bonus_tier, resolve_commission_tier, validate_bonus_tiers, validate_commission_tiers,
    BonusTier, CommissionTier, SalesPerformance, TierResolver, TierTable,
};
use reconciliation::{classify, ClosureIssue, Error as ShiftError, ShiftKey, ShiftReconciliation};
use rust_decimal::Decimal;
use security::{InputSanitizer, LoginDecision, LoginLimitConfig, LoginRateLimiter};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

/// One evaluation request, tagged by `op`
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    /// Bonus band lookup for a sales amount
    #[serde(rename_all = "camelCase")]
    ResolveBonus {
        amount: Money,
        tiers: Vec<BonusTier>,
    },

    /// Commission rate for an achievement percentage
    #[serde(rename_all = "camelCase")]
    ResolveCommission {
        achievement_percent: Decimal,
        tiers: Vec<CommissionTier>,
    },

    /// Any tier table against sales and goal
    #[serde(rename_all = "camelCase")]
    Resolve {
        table: TierTable,
        sales: Money,
        #[serde(default)]
        goal: Money,
    },

    /// Configuration-boundary check of a tier table
    #[serde(rename_all = "camelCase")]
    ValidateTiers { table: TierTable },

    /// Divergence between recorded and counted amounts
    #[serde(rename_all = "camelCase")]
    Classify {
        system_amount: Money,
        real_amount: Money,
    },

    /// Attempt to close a shift
    #[serde(rename_all = "camelCase")]
    CloseShift {
        key: ShiftKey,
        system_amount: Money,
        real_amount: Money,
        #[serde(default)]
        justification: Option<String>,
        #[serde(default)]
        justified: bool,
    },

    /// Display formatting
    #[serde(rename_all = "camelCase")]
    Format { amount: Money },

    /// Display parsing
    #[serde(rename_all = "camelCase")]
    Parse { text: String },

    /// Replay login attempts through the limiter
    #[serde(rename_all = "camelCase")]
    ReplayLogins { attempts: Vec<LoginAttempt> },
}

/// One login attempt in a replay
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginAttempt {
    /// Email typed by the user
    pub email: String,
    /// When the attempt happened
    pub at: DateTime<Utc>,
    /// Whether the credentials were accepted
    pub success: bool,
}

/// Evaluate a request into its JSON response
pub fn handle(request: Request, config: &Config) -> Result<Value> {
    let response = match request {
        Request::ResolveBonus { amount, tiers } => {
            serde_json::to_value(resolve_bonus_tier(amount, &tiers))?
        }
        Request::ResolveCommission {
            achievement_percent,
            tiers,
        } => json!({
            "commissionPercent": resolve_commission_tier(achievement_percent, &tiers),
        }),
        Request::Resolve { table, sales, goal } => {
            let outcome = TierResolver::new()
                .resolve(&table, &SalesPerformance::new(sales, goal))
                .context("Tier resolution failed")?;
            serde_json::to_value(outcome)?
        }
        Request::ValidateTiers { table } => {
            let result = match &table {
                TierTable::Bonus(tiers) => validate_bonus_tiers(tiers),
                TierTable::Commission(tiers) => validate_commission_tiers(tiers),
            };
            match result {
                Ok(()) => json!({ "valid": true }),
                Err(err) => json!({ "valid": false, "error": err.to_string() }),
            }
        }
        Request::Classify {
            system_amount,
            real_amount,
        } => serde_json::to_value(classify(system_amount, real_amount))?,
        Request::CloseShift {
            key,
            system_amount,
            real_amount,
            justification,
            justified,
        } => close_shift(key, system_amount, real_amount, justification, justified)?,
        Request::Format { amount } => json!({ "text": format_brl(amount) }),
        Request::Parse { text } => {
            let amount = parse_brl(&text).with_context(|| format!("Cannot parse '{}'", text))?;
            json!({ "amount": amount })
        }
        Request::ReplayLogins { attempts } => replay_logins(&attempts, config)?,
    };
    Ok(response)
}

fn close_shift(
    key: ShiftKey,
    system_amount: Money,
    real_amount: Money,
    justification: Option<String>,
    justified: bool,
) -> Result<Value> {
    let mut shift = ShiftReconciliation::new(key, system_amount, real_amount);

    if let Some(text) = justification {
        let text = InputSanitizer::new()
            .sanitize_justification(&text)
            .context("Justification rejected")?;
        shift.justify(text, justified)?;
    } else if justified {
        shift.justify(String::new(), true)?;
    }

    let issues: Vec<ClosureIssue> = match shift.close(chrono::Utc::now()) {
        Ok(()) => Vec::new(),
        Err(ShiftError::ClosureRejected(issues)) => issues,
        Err(err) => return Err(err.into()),
    };

    info!(shift = %shift.key, closed = shift.is_closed(), "Evaluated shift closure");

    Ok(json!({
        "closed": shift.is_closed(),
        "status": shift.status(),
        "report": shift.report(),
        "issues": issues,
        "messages": issues.iter().map(ToString::to_string).collect::<Vec<_>>(),
    }))
}

fn replay_logins(attempts: &[LoginAttempt], config: &Config) -> Result<Value> {
    let limiter = LoginRateLimiter::in_memory(LoginLimitConfig::from(&config.login));
    let mut outcomes = Vec::with_capacity(attempts.len());

    for attempt in attempts {
        let decision = limiter.check(&attempt.email, attempt.at)?;
        let outcome = match decision {
            LoginDecision::Locked { retry_after } => json!({
                "email": attempt.email,
                "allowed": false,
                "retryAfterSeconds": retry_after.as_secs(),
            }),
            LoginDecision::Allowed { .. } => {
                let remaining = if attempt.success {
                    limiter.record_success(&attempt.email)?;
                    config.login.max_attempts
                } else {
                    match limiter.record_failure(&attempt.email, attempt.at)? {
                        LoginDecision::Allowed { remaining } => remaining,
                        LoginDecision::Locked { .. } => 0,
                    }
                };
                json!({
                    "email": attempt.email,
                    "allowed": true,
                    "remainingAttempts": remaining,
                })
            }
        };
        outcomes.push(outcome);
    }

    Ok(json!({ "attempts": outcomes }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(request: &str) -> Value {
        let request: Request = serde_json::from_str(request).unwrap();
        handle(request, &Config::default()).unwrap()
    }

    #[test]
    fn test_resolve_bonus() {
        let response = eval(
            r#"{
                "op": "resolve_bonus",
                "amount": 1250.50,
                "tiers": [
                    {"lowerBound": 500, "upperBound": 999.99, "reward": 10},
                    {"lowerBound": 1000, "upperBound": 1499.99, "reward": 25},
                    {"lowerBound": 1500, "upperBound": 1999.99, "reward": 40},
                    {"lowerBound": 2000, "reward": 60}
                ]
            }"#,
        );
        assert_eq!(response["rewardIfQualified"], "25.00");
        assert_eq!(response["nextReward"], "40.00");
        assert_eq!(response["distanceToNextTier"], "249.50");
    }

    #[test]
    fn test_resolve_commission_table() {
        let response = eval(
            r#"{
                "op": "resolve",
                "table": {"kind": "commission", "tiers": [
                    {"thresholdPercent": 80, "commissionPercent": 1},
                    {"thresholdPercent": 100, "commissionPercent": 2}
                ]},
                "sales": 9000,
                "goal": 10000
            }"#,
        );
        assert_eq!(response["kind"], "commission");
        assert_eq!(response["commissionAmount"], "90.00");
    }

    #[test]
    fn test_validate_rejects_overlap() {
        let response = eval(
            r#"{
                "op": "validate_tiers",
                "table": {"kind": "bonus", "tiers": [
                    {"lowerBound": 0, "upperBound": 1000, "reward": 10},
                    {"lowerBound": 1000, "reward": 20}
                ]}
            }"#,
        );
        assert_eq!(response["valid"], false);
    }

    #[test]
    fn test_classify() {
        let response = eval(r#"{"op": "classify", "systemAmount": 1000.00, "realAmount": 950.00}"#);
        assert_eq!(response["difference"], "-50.00");
        assert_eq!(response["hasDivergence"], true);
        assert_eq!(response["severity"], "attention");
    }

    #[test]
    fn test_close_shift_reports_both_issues() {
        let response = eval(
            r#"{
                "op": "close_shift",
                "key": {"storeId": "loja-1", "sellerId": "vend-9", "date": "2024-03-15", "segment": "night"},
                "systemAmount": 980.00,
                "realAmount": 960.00,
                "justification": "",
                "justified": false
            }"#,
        );
        assert_eq!(response["closed"], false);
        assert_eq!(response["status"], "pending");
        assert_eq!(
            response["issues"],
            json!(["missing_justification", "not_confirmed"])
        );
    }

    #[test]
    fn test_close_justified_shift() {
        let response = eval(
            r#"{
                "op": "close_shift",
                "key": {"storeId": "loja-1", "sellerId": "vend-9", "date": "2024-03-15", "segment": "morning"},
                "systemAmount": 980.00,
                "realAmount": 960.00,
                "justification": "  Troco errado  ",
                "justified": true
            }"#,
        );
        assert_eq!(response["closed"], true);
        assert_eq!(response["status"], "closed");
    }

    #[test]
    fn test_format_and_parse() {
        assert_eq!(eval(r#"{"op": "format", "amount": 1234.5}"#)["text"], "R$ 1.234,50");
        assert_eq!(eval(r#"{"op": "parse", "text": "-R$ 50,00"}"#)["amount"], "-50.00");
    }

    #[test]
    fn test_parse_error_is_reported() {
        let request: Request = serde_json::from_str(r#"{"op": "parse", "text": "10,001"}"#).unwrap();
        assert!(handle(request, &Config::default()).is_err());
    }

    #[test]
    fn test_out_of_range_amount_is_a_request_error() {
        let huge = r#"{"op": "classify", "systemAmount": "79228162514264337593543950335", "realAmount": 0}"#;
        assert!(serde_json::from_str::<Request>(huge).is_err());

        let wide = r#"{"op": "classify", "systemAmount": -92233720368547758.00, "realAmount": 92233720368547758.00}"#;
        assert!(serde_json::from_str::<Request>(wide).is_err());
    }

    #[test]
    fn test_replay_logins_locks_out() {
        let response = eval(
            r#"{
                "op": "replay_logins",
                "attempts": [
                    {"email": "caixa@maiscapinhas.com.br", "at": "2024-03-15T10:00:00Z", "success": false},
                    {"email": "caixa@maiscapinhas.com.br", "at": "2024-03-15T10:00:05Z", "success": false},
                    {"email": "caixa@maiscapinhas.com.br", "at": "2024-03-15T10:00:10Z", "success": false},
                    {"email": "caixa@maiscapinhas.com.br", "at": "2024-03-15T10:00:15Z", "success": false},
                    {"email": "Caixa@MaisCapinhas.com.br", "at": "2024-03-15T10:00:20Z", "success": false},
                    {"email": "caixa@maiscapinhas.com.br", "at": "2024-03-15T10:05:20Z", "success": true},
                    {"email": "caixa@maiscapinhas.com.br", "at": "2024-03-15T10:15:20Z", "success": true}
                ]
            }"#,
        );
        let attempts = response["attempts"].as_array().unwrap();
        assert_eq!(attempts[0]["remainingAttempts"], 4);
        assert_eq!(attempts[4]["remainingAttempts"], 0);
        assert_eq!(attempts[5]["allowed"], false);
        assert_eq!(attempts[5]["retryAfterSeconds"], 600);
        assert_eq!(attempts[6]["allowed"], true);
    }
}
