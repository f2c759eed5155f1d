//! Shared test doubles for the sync crate
//!
//! In-memory fakes for every port the service and orchestrator depend on.
//! Fakes record their calls and report them over channels so tests can
//! await outcomes instead of sleeping.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use tokio::sync::mpsc;

use lnxpush_core::domain::account::SyncAccount;
use lnxpush_core::domain::newtypes::{AccountId, FolderId, ResolutionHandle};
use lnxpush_core::ports::account_directory::IAccountDirectory;
use lnxpush_core::ports::cloud_connection::ICloudConnection;
use lnxpush_core::ports::interaction::{IUserInteraction, ResolutionOutcome};
use lnxpush_core::ports::preference_store::IPreferenceStore;
use lnxpush_core::ports::upload_task::{IUploadTask, ProgressFn};

/// In-memory preference store
#[derive(Default)]
pub struct FakeStore {
    values: Mutex<HashMap<String, String>>,
}

impl FakeStore {
    pub fn with(entries: &[(&str, &str)]) -> Self {
        let store = Self::default();
        {
            let mut values = store.values.lock().unwrap();
            for (k, v) in entries {
                values.insert((*k).to_string(), (*v).to_string());
            }
        }
        store
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }
}

#[async_trait::async_trait]
impl IPreferenceStore for FakeStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

/// In-memory account directory with a permission gate and flag recording
pub struct FakeDirectory {
    pub permitted: bool,
    accounts: Mutex<Vec<SyncAccount>>,
    pub syncable_calls: Mutex<Vec<(AccountId, bool)>>,
    pub auto_sync_calls: Mutex<Vec<(AccountId, bool)>>,
}

impl FakeDirectory {
    pub fn with_accounts(accounts: Vec<SyncAccount>) -> Self {
        Self {
            permitted: true,
            accounts: Mutex::new(accounts),
            syncable_calls: Mutex::new(Vec::new()),
            auto_sync_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::with_accounts(Vec::new())
    }

    pub fn denied() -> Self {
        let mut dir = Self::empty();
        dir.permitted = false;
        dir
    }
}

#[async_trait::async_trait]
impl IAccountDirectory for FakeDirectory {
    async fn can_enumerate(&self) -> anyhow::Result<bool> {
        Ok(self.permitted)
    }

    async fn accounts_of_kind(&self, kind: &str) -> anyhow::Result<Vec<SyncAccount>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.kind() == kind)
            .cloned()
            .collect())
    }

    async fn set_syncable(&self, id: &AccountId, syncable: bool) -> anyhow::Result<()> {
        self.syncable_calls.lock().unwrap().push((*id, syncable));
        let mut accounts = self.accounts.lock().unwrap();
        if let Some(account) = accounts.iter_mut().find(|a| a.id() == id) {
            account.set_syncable(syncable);
        }
        Ok(())
    }

    async fn set_auto_sync(&self, id: &AccountId, enabled: bool) -> anyhow::Result<()> {
        self.auto_sync_calls.lock().unwrap().push((*id, enabled));
        let mut accounts = self.accounts.lock().unwrap();
        if let Some(account) = accounts.iter_mut().find(|a| a.id() == id) {
            account.set_auto_sync(enabled);
        }
        Ok(())
    }
}

/// Connection fake that counts attempts; outcomes are injected by tests
/// through the orchestrator's event channel
#[derive(Default)]
pub struct FakeConnection {
    pub connected: AtomicBool,
    pub connect_calls: AtomicUsize,
}

impl FakeConnection {
    pub fn attempts(&self) -> usize {
        self.connect_calls.load(Ordering::Acquire)
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Release);
    }
}

#[async_trait::async_trait]
impl ICloudConnection for FakeConnection {
    async fn connect(&self) -> anyhow::Result<()> {
        self.connect_calls.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }
}

/// Interaction fake reporting invocations over channels
pub struct FakeInteraction {
    pub pick_result: Option<FolderId>,
    pub resolve_result: ResolutionOutcome,
    pub picks_tx: mpsc::UnboundedSender<String>,
    pub resolutions_tx: mpsc::UnboundedSender<String>,
}

impl FakeInteraction {
    /// Returns the fake plus receivers for pick/resolve invocations
    /// (each message carries the account name / resolution handle)
    pub fn new(
        pick_result: Option<FolderId>,
        resolve_result: ResolutionOutcome,
    ) -> (
        Self,
        mpsc::UnboundedReceiver<String>,
        mpsc::UnboundedReceiver<String>,
    ) {
        let (picks_tx, picks_rx) = mpsc::unbounded_channel();
        let (resolutions_tx, resolutions_rx) = mpsc::unbounded_channel();
        (
            Self {
                pick_result,
                resolve_result,
                picks_tx,
                resolutions_tx,
            },
            picks_rx,
            resolutions_rx,
        )
    }
}

#[async_trait::async_trait]
impl IUserInteraction for FakeInteraction {
    async fn pick_folder(&self, account: &SyncAccount) -> anyhow::Result<Option<FolderId>> {
        let _ = self.picks_tx.send(account.name().to_string());
        Ok(self.pick_result.clone())
    }

    async fn resolve_auth(
        &self,
        _account: &SyncAccount,
        handle: &ResolutionHandle,
    ) -> anyhow::Result<ResolutionOutcome> {
        let _ = self.resolutions_tx.send(handle.as_str().to_string());
        Ok(self.resolve_result)
    }
}

/// Upload fake reporting each started transfer as (title, path, folder)
pub struct FakeUploader {
    pub uploads_tx: mpsc::UnboundedSender<(String, String, String)>,
}

impl FakeUploader {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(String, String, String)>) {
        let (uploads_tx, uploads_rx) = mpsc::unbounded_channel();
        (Self { uploads_tx }, uploads_rx)
    }
}

#[async_trait::async_trait]
impl IUploadTask for FakeUploader {
    async fn start(
        &self,
        file_title: &str,
        local_file_path: &Path,
        folder_id: &FolderId,
        _progress: Option<ProgressFn>,
    ) -> anyhow::Result<()> {
        let _ = self.uploads_tx.send((
            file_title.to_string(),
            local_file_path.display().to_string(),
            folder_id.as_str().to_string(),
        ));
        Ok(())
    }
}

/// A registered, syncable account the way `initialize_sync` leaves it
pub fn syncable_account(name: &str) -> SyncAccount {
    let mut account = SyncAccount::new(name, "drive");
    account.set_syncable(true);
    account.set_auto_sync(true);
    account
}
