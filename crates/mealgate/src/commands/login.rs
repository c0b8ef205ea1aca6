//! `mealgate login` / `mealgate logout` -- session-token management.
//!
//! The browser client gets its token from an SSO redirect and keeps it in
//! persistent storage; here the operator pastes the portal-issued JWT once
//! and it lives in a file until `logout`.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};

use mealgate_api::BearerToken;
use mealgate_config as cfg;

use crate::cli::{GlobalOpts, LoginArgs};
use crate::error::CliError;
use crate::output;

const DEFAULT_LOGIN_URL: &str = "https://login.example-event.com";

fn login_url() -> String {
    cfg::load_config()
        .ok()
        .and_then(|c| c.login_url)
        .unwrap_or_else(|| DEFAULT_LOGIN_URL.to_owned())
}

pub fn login(args: &LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let portal = login_url();

    let Some(raw) = args.token.clone().or_else(|| global.token.clone()) else {
        output::print_output(
            &format!(
                "Sign in at {portal}?redirect=cli and copy the issued token, then run:\n\
                 mealgate login --token <jwt>"
            ),
            global.quiet,
        );
        return Ok(());
    };

    let raw = SecretString::from(raw);
    let token = BearerToken::decode_checked(raw.clone(), Utc::now())
        .map_err(|e| CliError::from_core(e.into(), &portal))?;

    cfg::save_token(raw.expose_secret(), &cfg::token_path())?;

    let claims = token.claims();
    let who = claims.name.as_deref().unwrap_or(&claims.sub);
    let until = DateTime::<Utc>::from_timestamp(claims.exp, 0)
        .map_or_else(|| "unknown".into(), |t| t.to_rfc3339());
    output::print_output(
        &format!("Signed in as {who} (token valid until {until})"),
        global.quiet,
    );
    Ok(())
}

pub fn logout(global: &GlobalOpts) -> Result<(), CliError> {
    cfg::clear_token(&cfg::token_path())?;
    output::print_output(
        &format!("Signed out. Portal logout: {}/logout", login_url()),
        global.quiet,
    );
    Ok(())
}
