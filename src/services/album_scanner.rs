//! 相册扫描服务
//!
//! 在 tokio 阻塞线程池中执行分组与 bucket 查询，
//! 结果通过 [`ResultDispatcher`](crate::dispatch::ResultDispatcher) 交给调用方提供的一次性回调。

use tokio::runtime::Handle;

use crate::dispatch::SharedDispatcher;
use crate::models::{AlbumGroup, MediaRecord, PickerSettings};
use crate::services::gateway::{MediaIndex, SharedMediaIndex};
use crate::services::grouping::{query_bucket, select_grouping};
use crate::utils::error::{AppError, AppResult};

/// 相册扫描器
///
/// 不持有可变状态，可以被克隆并发使用；并发扫描之间互不影响。
#[derive(Clone)]
pub struct AlbumScanner {
    index: SharedMediaIndex,
    runtime: Handle,
    dispatcher: SharedDispatcher,
}

impl AlbumScanner {
    /// 创建扫描器
    pub fn new(index: SharedMediaIndex, runtime: Handle, dispatcher: SharedDispatcher) -> Self {
        Self {
            index,
            runtime,
            dispatcher,
        }
    }

    /// 使用当前 tokio 运行时创建扫描器
    pub fn with_current_runtime(
        index: SharedMediaIndex,
        dispatcher: SharedDispatcher,
    ) -> AppResult<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| AppError::Task(format!("没有可用的 tokio 运行时: {}", e)))?;
        Ok(Self::new(index, runtime, dispatcher))
    }

    /// 扫描并分组相册，失败时返回错误
    pub async fn try_scan_albums(&self, settings: PickerSettings) -> AppResult<Vec<AlbumGroup>> {
        let index = self.index.clone();
        self.runtime
            .spawn_blocking(move || scan_groups(index.as_ref(), &settings))
            .await
            .map_err(|e| AppError::Task(format!("扫描任务失败: {}", e)))?
    }

    /// 扫描并分组相册，失败时返回空列表
    pub async fn scan_albums(&self, settings: PickerSettings) -> Vec<AlbumGroup> {
        albums_or_empty(self.try_scan_albums(settings).await)
    }

    /// 查询单个 bucket，失败时返回错误
    pub async fn try_query_bucket(
        &self,
        settings: PickerSettings,
        bucket_id: i64,
    ) -> AppResult<Vec<MediaRecord>> {
        let index = self.index.clone();
        self.runtime
            .spawn_blocking(move || query_bucket(index.as_ref(), &settings, bucket_id))
            .await
            .map_err(|e| AppError::Task(format!("查询任务失败: {}", e)))?
    }

    /// 查询单个 bucket，失败时返回空列表
    pub async fn query_bucket(&self, settings: PickerSettings, bucket_id: i64) -> Vec<MediaRecord> {
        records_or_empty(bucket_id, self.try_query_bucket(settings, bucket_id).await)
    }

    /// 后台扫描，完成后通过分发器调用回调
    ///
    /// 扫描与分发都在阻塞线程池中执行，回调不会占用异步工作线程，
    /// 可以在回调中再次同步调用扫描器。
    pub fn scan_albums_with_callback<F>(&self, settings: PickerSettings, callback: F)
    where
        F: FnOnce(Vec<AlbumGroup>) + Send + 'static,
    {
        let index = self.index.clone();
        let dispatcher = self.dispatcher.clone();
        self.runtime.spawn_blocking(move || {
            let albums = albums_or_empty(scan_groups(index.as_ref(), &settings));
            dispatcher.dispatch(Box::new(move || callback(albums)));
        });
    }

    /// 后台查询 bucket，完成后通过分发器调用回调
    pub fn query_bucket_with_callback<F>(&self, settings: PickerSettings, bucket_id: i64, callback: F)
    where
        F: FnOnce(Vec<MediaRecord>) + Send + 'static,
    {
        let index = self.index.clone();
        let dispatcher = self.dispatcher.clone();
        self.runtime.spawn_blocking(move || {
            let records =
                records_or_empty(bucket_id, query_bucket(index.as_ref(), &settings, bucket_id));
            dispatcher.dispatch(Box::new(move || callback(records)));
        });
    }

    /// 打开相册
    ///
    /// 媒体列表已加载时直接返回；否则执行 bucket 查询并填充相册。
    pub async fn open_album<'a>(
        &self,
        album: &'a mut AlbumGroup,
        settings: &PickerSettings,
    ) -> AppResult<&'a [MediaRecord]> {
        if album.needs_population() {
            let records = self
                .try_query_bucket(settings.clone(), album.bucket_id)
                .await?;
            album.total = records.len();
            album.media_list = records;
        }
        Ok(&album.media_list)
    }
}

fn scan_groups(index: &dyn MediaIndex, settings: &PickerSettings) -> AppResult<Vec<AlbumGroup>> {
    select_grouping(settings).group(index, settings)
}

fn albums_or_empty(result: AppResult<Vec<AlbumGroup>>) -> Vec<AlbumGroup> {
    match result {
        Ok(albums) => {
            tracing::info!("相册扫描完成: {} 个相册", albums.len());
            albums
        }
        Err(e) => {
            tracing::warn!("相册扫描失败: {}", e);
            Vec::new()
        }
    }
}

fn records_or_empty(bucket_id: i64, result: AppResult<Vec<MediaRecord>>) -> Vec<MediaRecord> {
    match result {
        Ok(records) => {
            tracing::info!(bucket_id, "bucket 查询完成: {} 个文件", records.len());
            records
        }
        Err(e) => {
            tracing::warn!(bucket_id, "bucket 查询失败: {}", e);
            Vec::new()
        }
    }
}
