//! guia search - Search and filter listings

use std::path::PathBuf;

use clap::Args;
use tracing::{debug, warn};

use crate::app::AppContext;
use crate::catalog::{CatalogProvider, Coordinates, JsonFileCatalog, Locale};
use crate::cli::formatters::SearchReport;
use crate::cli::output::{emit_json, json_ok};
use crate::controller::FilterController;
use crate::error::{GuiaError, Result};
use crate::filter::criteria::{MAX_PRICE_LEVEL, MAX_RATING, MIN_PRICE_LEVEL, MIN_RATING};
use crate::filter::{CategoryFilter, Feature, SortMode};
use crate::geo::{FixedLocation, GeolocationAcquirer, PositionOptions};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Free-text query in Spanish or English
    #[arg(default_value = "")]
    pub query: String,

    /// Catalog JSON file
    #[arg(long, env = "GUIA_CATALOG", value_name = "FILE")]
    pub catalog: PathBuf,

    /// Display locale: es, en
    #[arg(long)]
    pub locale: Option<Locale>,

    /// Category id, or "all"
    #[arg(long, default_value = "all")]
    pub category: CategoryFilter,

    /// Subcategory (accent and case insensitive)
    #[arg(long)]
    pub subcategory: Option<String>,

    /// Lowest price level (1-4)
    #[arg(long, default_value_t = MIN_PRICE_LEVEL)]
    pub price_min: u8,

    /// Highest price level (1-4)
    #[arg(long, default_value_t = MAX_PRICE_LEVEL)]
    pub price_max: u8,

    /// Lowest rating (0-5)
    #[arg(long, default_value_t = MIN_RATING)]
    pub rating_min: f64,

    /// Highest rating (0-5)
    #[arg(long, default_value_t = MAX_RATING)]
    pub rating_max: f64,

    /// Required feature; repeat to accept any of several: wifi, parking, cards, pet_friendly
    #[arg(long = "feature", value_name = "FEATURE")]
    pub features: Vec<Feature>,

    /// Sort by: featured, rating, name, price, distance
    #[arg(long, default_value = "featured")]
    pub sort: SortMode,

    /// User position as LON,LAT
    #[arg(long, value_name = "LON,LAT", allow_hyphen_values = true)]
    pub near: Option<Coordinates>,

    /// Order by distance from --near, ahead of the sort mode
    #[arg(long)]
    pub by_distance: bool,

    /// Only listings open right now
    #[arg(long)]
    pub open_now: bool,

    /// Maximum number of results to print
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

pub fn run(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(|err| GuiaError::Runtime(format!("start runtime: {err}")))?;
    runtime.block_on(execute(ctx, args))
}

async fn execute(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    let catalog = JsonFileCatalog::new(&args.catalog).load()?;
    let controller = FilterController::from_config(catalog, &ctx.config)?;
    apply_args(&controller, args);

    let mut warnings = Vec::new();
    if let Some(near) = args.near {
        let acquirer = GeolocationAcquirer::new(
            FixedLocation(near),
            PositionOptions::from(&ctx.config.geolocation),
        );
        if let Err(err) = acquirer.request(&controller).await {
            warnings.push(format!("location unavailable: {err}"));
        }
    } else if args.by_distance || args.sort == SortMode::Distance {
        warn!("distance ordering requested without --near; keeping the sort mode order");
        warnings.push("distance ordering needs --near".to_string());
    }

    let results = controller.recompute_now();
    let criteria = controller.criteria();
    debug!(
        target: "search",
        results = results.len(),
        active_filters = criteria.active_filter_count(),
        "search complete"
    );

    let report = SearchReport {
        results: &results,
        criteria: &criteria,
        limit: args.limit.unwrap_or(ctx.config.output.limit),
    };

    if ctx.json() {
        emit_json(&json_ok(report.to_json()).with_warnings(warnings))
    } else {
        for warning in &warnings {
            eprintln!("{}", crate::cli::colors::GuiaStyles::warning(warning));
        }
        print!("{}", report.format_human());
        Ok(())
    }
}

fn apply_args(controller: &FilterController, args: &SearchArgs) {
    if let Some(locale) = args.locale {
        controller.set_locale(locale);
    }
    controller.set_search_query(args.query.as_str());
    controller.set_category(args.category);
    controller.set_subcategory(args.subcategory.clone());
    controller.set_price_range(args.price_min, args.price_max);
    controller.set_rating_range(args.rating_min, args.rating_max);
    controller.set_features(args.features.iter().copied());
    controller.set_sort_mode(args.sort);
    controller.set_distance_sort_enabled(args.by_distance);
    controller.set_open_now(args.open_now);
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::{Cli, Commands};

    fn parse(extra: &[&str]) -> SearchArgs {
        let mut argv = vec!["guia", "search", "--catalog", "listings.json"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Search(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn defaults_are_unrestricted() {
        let args = parse(&[]);
        assert_eq!(args.query, "");
        assert_eq!(args.category, CategoryFilter::All);
        assert_eq!((args.price_min, args.price_max), (1, 4));
        assert_eq!(args.sort, SortMode::Featured);
        assert!(args.near.is_none());
    }

    #[test]
    fn parses_negative_longitude_and_repeated_features() {
        let args = parse(&[
            "piramide",
            "--near",
            "-99.0966,18.9858",
            "--feature",
            "wifi",
            "--feature",
            "pet-friendly",
            "--category",
            "restaurant",
        ]);
        assert_eq!(args.query, "piramide");
        assert_eq!(args.near, Some(Coordinates::new(-99.0966, 18.9858)));
        assert_eq!(args.features, [Feature::Wifi, Feature::PetFriendly]);
        assert_eq!(
            args.category,
            CategoryFilter::Only(crate::catalog::Category::Restaurant)
        );
    }

    #[test]
    fn rejects_out_of_range_location() {
        let argv = ["guia", "search", "--catalog", "x.json", "--near", "200,0"];
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
