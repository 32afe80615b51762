//! # Ledger Store
//!
//! Owns the asset and rental collections and keeps them in a [`KvStore`].
//!
//! ```text
//! Ledger
//! ├── store: Box<dyn KvStore>     // persistence medium
//! ├── assets: Vec<Asset>          // working copy, source of truth at runtime
//! ├── rentals: Vec<Rental>
//! ├── meta: LedgerMeta            // schema version + seed time
//! └── storage_warning: Option<String>
//! ```
//!
//! Every mutation builds the next version of the collections, encodes them in
//! full, and only then writes them back (rentals first, then assets). An
//! encoding failure writes nothing. A write failure is logged and recorded
//! as a storage warning; the in-memory ledger still moves forward so the
//! session keeps working.
//!
//! `Asset::status` is a cache of "has an active rental". It is rewritten on
//! every check-out/check-in and reconciled against the rentals on load.

use std::fmt;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::core::kv::{self, KvStore, StorageError};
use crate::core::model::{Asset, AssetStatus, Rental};
use crate::core::seed;
use crate::core::status;

pub const ASSETS_KEY: &str = "rentrack.assets";
pub const RENTALS_KEY: &str = "rentrack.rentals";
pub const META_KEY: &str = "rentrack.meta";

/// Bumped when the on-disk shape changes; a mismatch reseeds.
pub const SCHEMA_VERSION: u32 = 1;

/// Key holding the last undecodable contents of `key`.
pub fn corrupt_key(key: &str) -> String {
    format!("{key}.corrupt")
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerMeta {
    pub schema_version: u32,
    pub seeded_at: Option<DateTime<Utc>>,
}

impl Default for LedgerMeta {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            seeded_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Check-out attempted on an asset that already has an active rental.
    ActiveRentalConflict { asset_id: String, rental_id: String },
    /// Check-in attempted on an asset with nothing checked out.
    NoActiveRental { asset_id: String },
    UnknownAsset { asset_id: String },
    DuplicateAsset { asset_id: String },
    DuplicateRental { rental_id: String },
    /// Check-out attempted with a rental that already has a return time.
    AlreadyReturned { rental_id: String },
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::ActiveRentalConflict { asset_id, rental_id } => {
                write!(f, "{asset_id} is already rented out (rental {rental_id})")
            }
            LedgerError::NoActiveRental { asset_id } => {
                write!(f, "{asset_id} has no active rental to check in")
            }
            LedgerError::UnknownAsset { asset_id } => write!(f, "no asset with id {asset_id}"),
            LedgerError::DuplicateAsset { asset_id } => {
                write!(f, "an asset with id {asset_id} already exists")
            }
            LedgerError::DuplicateRental { rental_id } => {
                write!(f, "a rental with id {rental_id} already exists")
            }
            LedgerError::AlreadyReturned { rental_id } => {
                write!(f, "rental {rental_id} is already marked returned")
            }
        }
    }
}

impl std::error::Error for LedgerError {}

/// Options for [`Ledger::open`].
#[derive(Debug, Clone, Copy)]
pub struct OpenOptions {
    /// Seed demo data when the store has no assets.
    pub reseed_when_empty: bool,
    /// Discard whatever is stored and reseed.
    pub force_reseed: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            reseed_when_empty: true,
            force_reseed: false,
        }
    }
}

pub struct Ledger {
    store: Box<dyn KvStore>,
    assets: Vec<Asset>,
    rentals: Vec<Rental>,
    meta: LedgerMeta,
    storage_warning: Option<String>,
}

impl Ledger {
    /// Load the ledger from `store`, seeding demo data when it is empty.
    ///
    /// Read failures never abort: unreadable or corrupt collections are
    /// logged and treated as empty.
    pub fn open(store: Box<dyn KvStore>, now: DateTime<Utc>, options: OpenOptions) -> Self {
        let mut ledger = Self {
            store,
            assets: Vec::new(),
            rentals: Vec::new(),
            meta: LedgerMeta::default(),
            storage_warning: None,
        };

        let stored_meta = ledger.read_meta();
        let schema_matches = stored_meta
            .as_ref()
            .is_none_or(|m| m.schema_version == SCHEMA_VERSION);

        if !schema_matches {
            warn!(
                "Stored schema version {:?} differs from {}, reseeding",
                stored_meta.as_ref().map(|m| m.schema_version),
                SCHEMA_VERSION
            );
        }

        if schema_matches && !options.force_reseed {
            ledger.assets = ledger.read_or_empty(ASSETS_KEY);
            ledger.rentals = ledger.read_or_empty(RENTALS_KEY);
            if let Some(meta) = stored_meta {
                ledger.meta = meta;
            }
        }

        let may_seed = options.reseed_when_empty || options.force_reseed || !schema_matches;
        if ledger.assets.is_empty() && may_seed {
            ledger.reset_demo(now);
        } else {
            ledger.reconcile_statuses();
        }

        info!(
            "Ledger opened on {} store: {} assets, {} rentals",
            ledger.store.name(),
            ledger.assets.len(),
            ledger.rentals.len()
        );
        ledger
    }

    /// In-memory ledger with demo data, for ephemeral sessions and tests.
    pub fn in_memory(now: DateTime<Utc>) -> Self {
        Self::open(Box::new(kv::MemoryKv::new()), now, OpenOptions::default())
    }

    pub fn list_assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn list_rentals(&self) -> &[Rental] {
        &self.rentals
    }

    pub fn asset(&self, asset_id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == asset_id)
    }

    pub fn active_rental(&self, asset_id: &str) -> Option<&Rental> {
        status::active_rental(asset_id, &self.rentals)
    }

    pub fn meta(&self) -> &LedgerMeta {
        &self.meta
    }

    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    /// Most recent persistence failure, if any write has failed.
    pub fn storage_warning(&self) -> Option<&str> {
        self.storage_warning.as_deref()
    }

    pub fn add_asset(&mut self, asset: Asset) -> Result<(), LedgerError> {
        if self.asset(&asset.id).is_some() {
            return Err(LedgerError::DuplicateAsset { asset_id: asset.id });
        }
        info!("Adding asset {} ({})", asset.id, asset.name);
        let mut assets = self.assets.clone();
        assets.push(asset);
        self.commit(assets, None);
        Ok(())
    }

    /// Record a new rental and mark its asset rented.
    pub fn check_out(&mut self, rental: Rental) -> Result<(), LedgerError> {
        let Some(index) = self.assets.iter().position(|a| a.id == rental.asset_id) else {
            return Err(LedgerError::UnknownAsset {
                asset_id: rental.asset_id,
            });
        };
        if !rental.is_active() {
            return Err(LedgerError::AlreadyReturned {
                rental_id: rental.id,
            });
        }
        if self.rentals.iter().any(|r| r.id == rental.id) {
            return Err(LedgerError::DuplicateRental {
                rental_id: rental.id,
            });
        }
        if let Some(active) = self.active_rental(&rental.asset_id) {
            return Err(LedgerError::ActiveRentalConflict {
                asset_id: rental.asset_id.clone(),
                rental_id: active.id.clone(),
            });
        }

        info!(
            "Checking out {} to {} until {}",
            rental.asset_id, rental.customer.name, rental.check_in_at
        );

        let mut assets = self.assets.clone();
        let asset = &mut assets[index];
        asset.status = AssetStatus::Rented;
        asset.site = rental.site.clone();
        asset.last_seen_at = rental.check_out_at;

        let mut rentals = self.rentals.clone();
        rentals.push(rental);
        self.commit(assets, Some(rentals));
        Ok(())
    }

    /// Close the active rental on `asset_id` at `now`. Returns the closed rental.
    pub fn check_in(&mut self, asset_id: &str, now: DateTime<Utc>) -> Result<Rental, LedgerError> {
        let Some(index) = self.assets.iter().position(|a| a.id == asset_id) else {
            return Err(LedgerError::UnknownAsset {
                asset_id: asset_id.to_string(),
            });
        };
        let Some(rental_index) = self
            .rentals
            .iter()
            .position(|r| r.asset_id == asset_id && r.is_active())
        else {
            return Err(LedgerError::NoActiveRental {
                asset_id: asset_id.to_string(),
            });
        };

        let mut rentals = self.rentals.clone();
        rentals[rental_index].returned_at = Some(now);
        let closed = rentals[rental_index].clone();

        let mut assets = self.assets.clone();
        assets[index].status = AssetStatus::Idle;
        assets[index].last_seen_at = now;

        info!(
            "Checked in {} (rental {}, {} days late)",
            asset_id,
            closed.id,
            status::late_days(&closed)
        );
        self.commit(assets, Some(rentals));
        Ok(closed)
    }

    /// Replace everything with fresh demo data.
    pub fn reset_demo(&mut self, now: DateTime<Utc>) {
        let (assets, rentals) = seed::demo_ledger(now);
        info!("Seeding demo ledger: {} assets, {} rentals", assets.len(), rentals.len());
        self.meta = LedgerMeta {
            schema_version: SCHEMA_VERSION,
            seeded_at: Some(now),
        };
        self.write_meta();
        self.commit(assets, Some(rentals));
    }

    /// Make every asset's cached status agree with the rental list.
    fn reconcile_statuses(&mut self) {
        for asset in &mut self.assets {
            let expected = if status::active_rental(&asset.id, &self.rentals).is_some() {
                AssetStatus::Rented
            } else {
                AssetStatus::Idle
            };
            if asset.status != expected {
                warn!(
                    "Asset {} status {:?} disagrees with rentals, correcting to {:?}",
                    asset.id, asset.status, expected
                );
                asset.status = expected;
            }
        }
    }

    /// Install the next collections and persist them.
    /// `rentals == None` means the rental list is unchanged and is not rewritten.
    fn commit(&mut self, assets: Vec<Asset>, rentals: Option<Vec<Rental>>) {
        let encoded = kv::encode_collection(&assets).and_then(|a| {
            rentals
                .as_deref()
                .map(kv::encode_collection)
                .transpose()
                .map(|r| (a, r))
        });

        match encoded {
            Ok((assets_json, rentals_json)) => {
                let mut result = Ok(());
                if let Some(json) = rentals_json {
                    result = self.store.set(RENTALS_KEY, &json);
                }
                if result.is_ok() {
                    result = self.store.set(ASSETS_KEY, &assets_json);
                }
                match result {
                    Ok(()) => {
                        debug!("Ledger persisted to {} store", self.store.name());
                        self.storage_warning = None;
                    }
                    Err(e) => self.record_storage_failure(e),
                }
            }
            Err(e) => self.record_storage_failure(e),
        }

        self.assets = assets;
        if let Some(rentals) = rentals {
            self.rentals = rentals;
        }
    }

    fn record_storage_failure(&mut self, error: StorageError) {
        warn!("Failed to persist ledger, continuing in memory: {}", error);
        self.storage_warning = Some(format!("Not saved: {error}"));
    }

    fn read_or_empty<T: serde::de::DeserializeOwned>(&mut self, key: &str) -> Vec<T> {
        let json = match self.store.get(key) {
            Ok(Some(json)) => json,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Could not read {}: {}", key, e);
                self.storage_warning = Some(format!("Could not load {key}: {e}"));
                return Vec::new();
            }
        };
        match serde_json::from_str(&json) {
            Ok(items) => items,
            Err(e) => {
                warn!("Could not decode {}: {}", key, e);
                self.backup_corrupt(key, &json);
                self.storage_warning = Some(format!("Could not load {key}: {e}"));
                Vec::new()
            }
        }
    }

    /// Copy an undecodable collection to `<key>.corrupt` before it is overwritten.
    fn backup_corrupt(&mut self, key: &str, json: &str) {
        let backup = corrupt_key(key);
        match self.store.set(&backup, json) {
            Ok(()) => warn!("Kept unreadable {} as {}", key, backup),
            Err(e) => warn!("Could not back up unreadable {}: {}", key, e),
        }
    }

    fn read_meta(&mut self) -> Option<LedgerMeta> {
        let json = match self.store.get(META_KEY) {
            Ok(json) => json?,
            Err(e) => {
                warn!("Could not read {}: {}", META_KEY, e);
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(meta) => Some(meta),
            Err(e) => {
                warn!("Ignoring corrupt {}: {}", META_KEY, e);
                None
            }
        }
    }

    fn write_meta(&mut self) {
        let result = serde_json::to_string_pretty(&self.meta)
            .map_err(StorageError::from)
            .and_then(|json| self.store.set(META_KEY, &json));
        if let Err(e) = result {
            self.record_storage_failure(e);
        }
    }
}
