use std::sync::Arc;

use eframe::egui;

use crowdfund_gui::app::App;
use crowdfund_gui::config::Config;
use crowdfund_gui::horizon::HorizonBalanceSource;
use crowdfund_gui::service::Collaborators;
use crowdfund_gui::stellar_cli::{
    StellarCli, StellarCliFactory, StellarCliPipeline, StellarCliWallet,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();

    env_logger::init();

    let config = Config::load().unwrap_or_else(|e| {
        log::warn!("Falling back to default config: {}", e);
        Config::default()
    });
    let network = config.network_config()?;
    log::info!(
        "🌐 {} via {} (contract {})",
        network.network,
        network.rpc_url,
        network.contract_id
    );

    let cli = StellarCli::new(&config.stellar_bin);
    let collaborators = Collaborators {
        wallet: Arc::new(StellarCliWallet::new(cli.clone(), &config.identity)),
        balances: Arc::new(HorizonBalanceSource::new(&network.horizon_url)?),
        contracts: Arc::new(StellarCliFactory::new(cli.clone())),
        pipeline: Arc::new(StellarCliPipeline::new(
            cli,
            &config.identity,
            network.clone(),
        )),
        network,
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 680.0])
            .with_min_inner_size([640.0, 520.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Learning Stellar",
        options,
        Box::new(move |cc| Ok(Box::new(App::new(cc, collaborators)))),
    );

    drop(_guard);
    rt.shutdown_timeout(std::time::Duration::from_secs(2));

    result?;
    Ok(())
}
