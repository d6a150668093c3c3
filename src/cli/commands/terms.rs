//! guia terms - Show query expansion

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::catalog::Locale;
use crate::cli::output::{HumanLayout, emit_human, emit_json, json_ok};
use crate::engine::SearchEngine;
use crate::error::Result;
use crate::filter::FilterCriteria;
use crate::search::normalize;

#[derive(Args, Debug)]
pub struct TermsArgs {
    /// Query to expand
    pub query: String,

    /// Locale whose synonym table is consulted: es, en
    #[arg(long)]
    pub locale: Option<Locale>,
}

#[derive(Debug, Serialize)]
pub struct TermsReport {
    pub query: String,
    pub normalized: String,
    pub locale: Locale,
    pub terms: Vec<String>,
}

#[must_use]
pub fn expand(ctx: &AppContext, args: &TermsArgs) -> TermsReport {
    let locale = args.locale.unwrap_or(ctx.config.search.default_locale);
    let criteria = FilterCriteria {
        search_query: args.query.clone(),
        ..FilterCriteria::with_locale(locale)
    };
    TermsReport {
        query: args.query.clone(),
        normalized: normalize(&args.query),
        locale,
        terms: SearchEngine::from_config(&ctx.config.search).terms_for(&criteria),
    }
}

pub fn run(ctx: &AppContext, args: &TermsArgs) -> Result<()> {
    let report = expand(ctx, args);
    if ctx.json() {
        return emit_json(&json_ok(report));
    }

    let mut layout = HumanLayout::new();
    layout
        .title("Query expansion")
        .kv("query", &report.query)
        .kv("normalized", &report.normalized)
        .kv("locale", report.locale.as_str())
        .blank();
    if report.normalized.is_empty() {
        layout.push_line("(empty query)");
    }
    for term in &report.terms {
        layout.push_line(format!("- {term}"));
    }
    emit_human(layout);
    Ok(())
}
