use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use prospect_kpi::config::AppConfig;
use prospect_kpi::error::AppError;
use prospect_kpi::workflows::crm_export::{write_export, CrmExportLoader};
use prospect_kpi::workflows::prospecting::{
    Channel, DateFilterMode, FilterCriteria, KpiCard, MissionContext, MissionContextRequest,
    OfferCatalog, ProspectingReport, ReportCadence, ReportDocument,
};
use std::fmt::{self, Write as _};
use std::fs::File;
use std::io::Write as _;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct FilterArgs {
    /// Keep contacts of this campaign (repeatable)
    #[arg(long = "campaign", value_name = "CAMPAIGN")]
    pub(crate) campaigns: Vec<String>,
    /// Keep contacts with this job title (repeatable)
    #[arg(long = "job-title", value_name = "TITLE")]
    pub(crate) job_titles: Vec<String>,
    /// Keep contacts in this sector (repeatable)
    #[arg(long = "sector", value_name = "SECTOR")]
    pub(crate) sectors: Vec<String>,
    /// Keep contacts with this company size (repeatable)
    #[arg(long = "company-size", value_name = "SIZE")]
    pub(crate) company_sizes: Vec<String>,
    /// Keep contacts at this location (repeatable)
    #[arg(long = "location", value_name = "LOCATION")]
    pub(crate) locations: Vec<String>,
    /// Earliest call or activity day (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) start: Option<NaiveDate>,
    /// Latest call or activity day, inclusive (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) end: Option<NaiveDate>,
    /// Return no contacts when a date bound matches none instead of ignoring the bound
    #[arg(long)]
    pub(crate) strict_dates: bool,
}

impl FilterArgs {
    pub(crate) fn into_criteria(self, configured: DateFilterMode) -> FilterCriteria {
        let date_mode = if self.strict_dates {
            DateFilterMode::Strict
        } else {
            configured
        };

        FilterCriteria {
            campaigns: self.campaigns,
            job_titles: self.job_titles,
            sectors: self.sectors,
            company_sizes: self.company_sizes,
            locations: self.locations,
            start: self.start.and_then(|day| day.and_hms_opt(0, 0, 0)),
            end: self.end.and_then(|day| day.and_hms_opt(23, 59, 59)),
            date_mode: Some(date_mode),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum CadenceArg {
    #[default]
    Weekly,
    Monthly,
}

impl From<CadenceArg> for ReportCadence {
    fn from(value: CadenceArg) -> Self {
        match value {
            CadenceArg::Weekly => ReportCadence::Weekly,
            CadenceArg::Monthly => ReportCadence::Monthly,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// CRM contact export (CSV)
    #[arg(long)]
    pub(crate) csv: PathBuf,
    #[command(flatten)]
    pub(crate) filters: FilterArgs,
    /// Client name shown in the mission header
    #[arg(long)]
    pub(crate) client: Option<String>,
    /// Offer from the catalog (see `offers`)
    #[arg(long)]
    pub(crate) offer: Option<String>,
    /// Contacts per cycle, required for the custom offer
    #[arg(long)]
    pub(crate) contacts_target: Option<u32>,
    /// Reporting cadence
    #[arg(long, value_enum, default_value_t = CadenceArg::Weekly)]
    pub(crate) cadence: CadenceArg,
    /// Cycle label, e.g. "Semaine 3"
    #[arg(long)]
    pub(crate) cycle: Option<String>,
    /// Print the report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

impl ReportArgs {
    fn context_request(&self) -> Option<MissionContextRequest> {
        let requested = self.client.is_some()
            || self.offer.is_some()
            || self.contacts_target.is_some()
            || self.cycle.is_some();
        requested.then(|| MissionContextRequest {
            client_name: self.client.clone(),
            offer: self.offer.clone(),
            contacts_target: self.contacts_target,
            cadence: self.cadence.into(),
            cycle_label: self.cycle.clone(),
            channels: None,
        })
    }
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// CRM contact export (CSV)
    #[arg(long)]
    pub(crate) csv: PathBuf,
    #[command(flatten)]
    pub(crate) filters: FilterArgs,
    /// Destination file (defaults to stdout)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct OffersArgs {
    /// Print the catalog as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

fn configured_date_mode() -> Result<DateFilterMode, AppError> {
    Ok(AppConfig::load()?.reporting.date_filter_mode)
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let context = args
        .context_request()
        .map(|request| MissionContext::resolve(&OfferCatalog::standard(), request))
        .transpose()?;

    let dataset = CrmExportLoader::from_path(&args.csv)?;
    let criteria = args.filters.into_criteria(configured_date_mode()?);
    let report = ProspectingReport::generate(&dataset, &criteria);
    let document = report.document(context);

    if args.json {
        let body = serde_json::to_string_pretty(&document).map_err(std::io::Error::from)?;
        println!("{body}");
    } else {
        let rendered = render_report(&document)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
        print!("{rendered}");
    }
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let dataset = CrmExportLoader::from_path(&args.csv)?;
    let criteria = args.filters.into_criteria(configured_date_mode()?);
    let report = ProspectingReport::generate(&dataset, &criteria);

    match args.output {
        Some(path) => {
            write_export(&report.filtered, File::create(&path)?)?;
            eprintln!(
                "Wrote {} of {} contacts to {}",
                report.contacts_filtered(),
                report.contacts_total,
                path.display()
            );
        }
        None => write_export(&report.filtered, std::io::stdout().lock())?,
    }
    Ok(())
}

pub(crate) fn run_offers(args: OffersArgs) -> Result<(), AppError> {
    let catalog = OfferCatalog::standard();
    if args.json {
        let body =
            serde_json::to_string_pretty(catalog.offers()).map_err(std::io::Error::from)?;
        println!("{body}");
        return Ok(());
    }

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "Offer catalog")?;
    for offer in catalog.offers() {
        let target = match offer.contacts_target {
            Some(target) => format!("{target} contacts / cycle"),
            None => "target set per mission".to_string(),
        };
        let channels = channel_labels(&offer.channels);
        if offer.linkedin_optional {
            writeln!(
                stdout,
                "- {}: {} | {} (+ LinkedIn optional)",
                offer.name, target, channels
            )?;
        } else {
            writeln!(stdout, "- {}: {} | {}", offer.name, target, channels)?;
        }
    }
    Ok(())
}

fn channel_labels(channels: &[Channel]) -> String {
    channels
        .iter()
        .map(|channel| channel.label())
        .collect::<Vec<_>>()
        .join(", ")
}

fn percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

fn render_cards(out: &mut String, title: &str, cards: &[KpiCard]) -> fmt::Result {
    writeln!(out, "\n{title}")?;
    for card in cards {
        match card.rate {
            Some(rate) => writeln!(out, "- {}: {} ({})", card.label, card.count, percent(rate))?,
            None => writeln!(out, "- {}: {}", card.label, card.count)?,
        }
    }
    Ok(())
}

pub(crate) fn render_report(document: &ReportDocument) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Prospecting report")?;
    writeln!(
        out,
        "Contacts: {} in export, {} after filters",
        document.contacts_total, document.contacts_filtered
    )?;

    if let Some(context) = &document.context {
        writeln!(
            out,
            "Mission: {} | {} ({} contacts / cycle) | {} | {}",
            context.client_name,
            context.offer,
            context.contacts_target,
            context.cadence_label,
            context.cycle_label
        )?;
        writeln!(out, "Channels: {}", context.channel_labels())?;
    }

    render_cards(&mut out, "Téléphone", &document.summary.phone)?;
    render_cards(&mut out, "E-mail", &document.summary.email)?;
    render_cards(&mut out, "Rendez-vous", &document.summary.meetings)?;

    if document.distribution.is_empty() {
        writeln!(out, "\nCall outcome tags: none")?;
    } else {
        writeln!(out, "\nCall outcome tags")?;
        for row in &document.distribution {
            let marker = if row.known { "" } else { " [unrecognized]" };
            writeln!(
                out,
                "- {}: {} ({}){}",
                row.tag,
                row.count,
                percent(row.rate),
                marker
            )?;
        }
    }

    Ok(out)
}
