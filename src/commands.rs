use std::path::PathBuf;
use tracing::info;

use graphdump::config::Config;
use graphdump::export::{ExportTarget, Exporter};
use graphdump::store::{GraphDocument, ObjectStore};

use crate::cli::{ExportArgs, LoadArgs};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub fn export(config: Option<PathBuf>, args: ExportArgs) -> Result<(), AnyError> {
    let config = Config::load(config)?;
    let exporter = Exporter::from_config(&config)?;
    // Only read from here on; fjall may still touch its journal on open.
    let store = ObjectStore::open_existing(&args.source)?;

    let root = exporter.node(store.root()?)?;
    let site = exporter.traverse(root, &args.segments)?;
    let target = ExportTarget::from_destination(&args.destination)?;

    let summary = exporter.export(site, &target)?;
    info!(
        source = %args.source.display(),
        destination = %target.content_path().display(),
        files = summary.files_written,
        "Done"
    );
    Ok(())
}

pub fn load(args: LoadArgs) -> Result<(), AnyError> {
    let document = GraphDocument::from_path(&args.document)?;
    let store = ObjectStore::open(&args.store)?;
    let count = store.import(&document)?;
    info!(
        store = %args.store.display(),
        objects = count,
        "Store loaded"
    );
    Ok(())
}

pub fn show_config(config: Option<PathBuf>) -> Result<(), AnyError> {
    let config = Config::load(config)?;
    print!("{}", config.to_toml()?);
    Ok(())
}
