//! Headless shell: loads configuration, builds the application context and
//! runs every page controller once, logging what each page would show.
//!
//! Usage: `invoice-dashboard-shell [IMAGE [KIND]]` where KIND is one of
//! facture, cheque or kimbiale (default facture).

use std::path::Path;

use anyhow::Result;
use log::{error, info, warn};

use invoice_dashboard::controllers::{
    AiProcessingController, ChequesController, DashboardController, InvoicesController, Notice, NoticeLevel,
    SettingsController,
};
use invoice_dashboard::services::config::AppConfig;
use invoice_dashboard::services::date_utils::format_display_date;
use invoice_dashboard::services::logging::init_logging;
use invoice_dashboard::services::upload::ImageUpload;
use invoice_dashboard::AppContext;

fn report(page: &str, notices: Vec<Notice>) {
    for notice in notices {
        match notice.level {
            NoticeLevel::Success => info!("[{}] {}", page, notice.message),
            NoticeLevel::Error => warn!("[{}] {}", page, notice.message),
        }
    }
}

async fn run(context: &AppContext, image: Option<(String, String)>) -> Result<()> {
    let settings = SettingsController::new(context);
    info!("Theme: {}", settings.theme());

    let mut dashboard = DashboardController::new(context);
    dashboard.load().await;
    match (dashboard.stats(), dashboard.failure_panel()) {
        (Some(stats), _) => info!(
            "Dashboard{}: {} invoices, revenue {:.2}, {} pending, {} overdue ({})",
            if dashboard.is_offline() { " (offline)" } else { "" },
            stats.total_invoices,
            stats.total_revenue,
            stats.pending_invoices,
            stats.overdue_invoices,
            dashboard.overdue_attention().unwrap_or_default()
        ),
        (None, Some(panel)) => error!("{}", panel),
        (None, None) => {}
    }
    report("dashboard", dashboard.take_notices());

    let mut invoices = InvoicesController::new(context);
    invoices.load().await;
    for invoice in invoices.visible() {
        info!(
            "Invoice {} for {}: {:.2} [{}] due {}",
            invoice.number,
            invoice.client_name,
            invoice.total,
            invoice.status.label(),
            format_display_date(&invoice.due_date)
        );
    }
    for id in invoices.totals_report() {
        warn!("Invoice {} totals do not add up", id);
    }
    report("invoices", invoices.take_notices());

    let cheques = ChequesController::new();
    let summary = cheques.summary();
    info!(
        "Cheques: {} pending, {} cashed, {} cancelled, total {:.2}",
        summary.pending, summary.cashed, summary.cancelled, summary.total_amount
    );

    if let Some((path, kind)) = image {
        let upload = ImageUpload::read(Path::new(&path))?;
        let mut ai = AiProcessingController::new(context);
        if ai.process(&upload, &kind).await {
            if let Some(export) = ai.export_json() {
                info!("{}:\n{}", export.file_name, export.contents);
            }
        }
        report("ai", ai.take_notices());
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    info!("Starting invoice dashboard shell");

    let mut args = std::env::args().skip(1);
    let image = args
        .next()
        .map(|path| (path, args.next().unwrap_or_else(|| "facture".to_string())));

    let config_path = AppConfig::default_path();
    let config = AppConfig::load_or_create(&config_path)?.with_env_overrides()?;
    info!("Configuration loaded from {:?} (data source: {})", config_path, config.data_source);

    let context = AppContext::initialize(config, &config_path)?;
    run(&context, image).await
}
