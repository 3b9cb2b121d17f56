use std::path::Path;

use crate::{
    config, error, info,
    management::{BlobStore, FsBlobStore, ObjectBlobStore},
    reconciler::{ReconcileOptions, Reconciler},
    signal, spotify, success,
};

/// Authenticates, then runs one shuffle with the given options.
///
/// Exits the process with status 1 on any failure.
pub async fn shuffle(creds_path: &Path, options: ReconcileOptions) {
    let credentials = match config::load_credentials(creds_path) {
        Ok(credentials) => credentials,
        Err(e) => error!("Cannot load credentials. Err: {}", e),
    };

    let store: Box<dyn BlobStore> = match config::storage_bucket() {
        Some(bucket) => match ObjectBlobStore::gcs(&bucket) {
            Ok(store) => {
                info!("Using storage bucket {}.", bucket);
                Box::new(store)
            }
            Err(e) => error!("Cannot open storage bucket. Err: {}", e),
        },
        None => Box::new(FsBlobStore::new(config::store_dir())),
    };

    let cancel = signal::install_handler();

    let client = match spotify::auth::authenticate(&credentials, &cancel).await {
        Ok(client) => client,
        Err(e) => error!("Authentication failed. Err: {}", e),
    };
    success!("Authentication successful!");

    let reconciler = Reconciler::new(&client, store.as_ref(), cancel);

    if let Err(e) = reconciler.reconcile(&options).await {
        error!("{}", e);
    }
}
