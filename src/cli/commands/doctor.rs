//! Doctor command - verify configuration and credentials.

use crate::budget::TokenBudget;
use crate::cli::Output;
use crate::config::Settings;
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Toolbelt Doctor");
    println!();

    let mut checks = Vec::new();

    println!("{}", style("API Keys").bold());
    let key_checks = vec![
        check_key(
            "OpenAI",
            settings.openai_api_key().is_some(),
            "needed by 'ask'",
            "export OPENAI_API_KEY='sk-...' or set openai.api_key",
        ),
        check_key(
            "SerpAPI",
            settings.serp_api_key().is_some(),
            "needed by 'google'",
            "export SERP_API_KEY='...' or set search.api_key",
        ),
    ];
    for check in &key_checks {
        check.print();
    }
    checks.extend(key_checks);

    println!();

    println!("{}", style("Token Budget").bold());
    let budget_check = check_budget(settings);
    budget_check.print();
    checks.push(budget_check);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!("{} error(s) found.", errors));
        anyhow::bail!("doctor found {} error(s)", errors);
    } else if warnings > 0 {
        Output::warning(&format!(
            "{} warning(s). Some commands will be unavailable.",
            warnings
        ));
    } else {
        Output::success("All checks passed.");
    }

    Ok(())
}

fn check_key(name: &str, present: bool, needed_by: &str, hint: &str) -> CheckResult {
    if present {
        CheckResult::ok(name, "configured")
    } else {
        CheckResult::warning(name, &format!("not set ({})", needed_by), hint)
    }
}

fn check_budget(settings: &Settings) -> CheckResult {
    match TokenBudget::from_settings(&settings.tokens) {
        Ok(budget) => CheckResult::ok(
            "Tokenizer",
            &format!("{} tokens, measured for {}", budget.limit(), settings.tokens.model),
        ),
        Err(e) => CheckResult::error("Tokenizer", &e.to_string(), "check the [tokens] section"),
    }
}

fn check_config_file() -> CheckResult {
    let path = Settings::default_config_path();
    if path.exists() {
        CheckResult::ok("Config file", &path.display().to_string())
    } else {
        CheckResult::ok("Config file", "using defaults (run 'toolbelt config init' to create one)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_warning() {
        let check = check_key("SerpAPI", false, "needed by 'google'", "hint");
        assert_eq!(check.status, CheckStatus::Warning);
        assert!(check.hint.is_some());
    }

    #[test]
    fn test_default_budget_is_ok() {
        let check = check_budget(&Settings::default());
        assert_eq!(check.status, CheckStatus::Ok);
        assert!(check.message.contains("4000"));
    }

    #[test]
    fn test_zero_budget_is_error() {
        let mut settings = Settings::default();
        settings.tokens.limit = 0;
        assert_eq!(check_budget(&settings).status, CheckStatus::Error);
    }
}
