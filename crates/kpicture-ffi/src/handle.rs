//! KPictureHandle - opaque handle owning the runtime, index and settings.

use kpicture_lib::{
    AlbumScanner, AppResult, Database, DispatchQueue, InlineDispatcher, PickerSettings,
    SettingsManager, SharedDispatcher, TaskQueueDispatcher,
};
use parking_lot::{Mutex, RwLock};
use std::ffi::{c_void, CString};
use std::os::raw::c_char;
use std::path::PathBuf;
use std::sync::Arc;

/// Callback receiving a JSON result.
/// - `json`: null-terminated UTF-8, valid only for the duration of the call
/// - `user_data`: user-provided context pointer
pub type ResultCallback = extern "C" fn(json: *const c_char, user_data: *mut c_void);

/// Stored callback with user data.
pub struct StoredCallback {
    pub callback: ResultCallback,
    pub user_data: *mut c_void,
}

// SAFETY: user_data is managed by the caller and must be thread-safe
unsafe impl Send for StoredCallback {}
unsafe impl Sync for StoredCallback {}

impl StoredCallback {
    pub fn new(callback: ResultCallback, user_data: *mut c_void) -> Self {
        Self {
            callback,
            user_data,
        }
    }

    /// Invoke the callback with a serialized payload.
    pub fn deliver<T: serde::Serialize>(self, payload: &T) {
        let json = serde_json::to_string(payload).unwrap_or_else(|e| {
            tracing::error!("Failed to serialize callback payload: {}", e);
            "[]".to_string()
        });
        if let Ok(cstr) = CString::new(json) {
            (self.callback)(cstr.as_ptr(), self.user_data);
        }
    }
}

/// Options accepted by `kpicture_init`.
pub struct HandleOptions {
    /// SQLite media index path; `None` uses the platform data directory.
    pub db_path: Option<PathBuf>,
    /// Directory holding settings.json; `None` uses the platform data directory.
    pub settings_dir: Option<PathBuf>,
    /// Queue callbacks until `kpicture_run_pending_callbacks` is called.
    pub queued_callbacks: bool,
}

/// Opaque handle exposed to C.
pub struct KPictureHandle {
    pub runtime: tokio::runtime::Runtime,
    pub database: Arc<Database>,
    pub scanner: AlbumScanner,
    pub settings_manager: SettingsManager,
    pub settings: RwLock<PickerSettings>,
    pub queue: Mutex<Option<DispatchQueue>>,
}

impl KPictureHandle {
    pub fn new(options: HandleOptions) -> AppResult<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .thread_name("kpicture-worker")
            .enable_all()
            .build()?;

        let database = Database::open(
            options
                .db_path
                .unwrap_or_else(kpicture_lib::db::default_db_path),
        )?;
        database.init()?;
        let database = Arc::new(database);

        let settings_manager = match options.settings_dir {
            Some(dir) => SettingsManager::new(dir)?,
            None => SettingsManager::with_default_dir()?,
        };
        let settings = settings_manager.load()?;

        let (dispatcher, queue): (SharedDispatcher, Option<DispatchQueue>) =
            if options.queued_callbacks {
                let (dispatcher, queue) = TaskQueueDispatcher::new();
                (Arc::new(dispatcher), Some(queue))
            } else {
                (Arc::new(InlineDispatcher), None)
            };

        let scanner = AlbumScanner::new(database.clone(), runtime.handle().clone(), dispatcher);

        Ok(Self {
            runtime,
            database,
            scanner,
            settings_manager,
            settings: RwLock::new(settings),
            queue: Mutex::new(queue),
        })
    }

    /// Snapshot of the current settings.
    pub fn settings(&self) -> PickerSettings {
        self.settings.read().clone()
    }

    /// Replace and persist the settings.
    pub fn update_settings(&self, settings: PickerSettings) -> AppResult<()> {
        self.settings_manager.save(&settings)?;
        *self.settings.write() = settings;
        Ok(())
    }
}
