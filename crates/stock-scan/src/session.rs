//! 掃描工作階段管理

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use stock_barcode::{clean_barcode, validate_barcode};
use stock_core::{Clock, IdGenerator, Result, ScanResult, ScanSession, ScanSessionType, StockError};

/// 工作階段儲存庫
///
/// 同一工作階段的修改必須互斥；不同工作階段可並行。
pub trait SessionRepository: Send + Sync {
    /// 新增工作階段
    fn insert(&self, session: ScanSession);

    /// 取得工作階段快照
    fn get(&self, session_id: &str) -> Option<ScanSession>;

    /// 在工作階段鎖內執行修改，工作階段不存在時回傳 `None`
    fn with_session_mut<T, F>(&self, session_id: &str, f: F) -> Option<T>
    where
        F: FnOnce(&mut ScanSession) -> T;

    /// 所有進行中的工作階段
    fn list_active(&self) -> Vec<ScanSession>;
}

/// 記憶體內的工作階段儲存庫（每個工作階段各持一把鎖）
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<String, Arc<Mutex<ScanSession>>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, session_id: &str) -> Option<Arc<Mutex<ScanSession>>> {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        sessions.get(session_id).cloned()
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn insert(&self, session: ScanSession) {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.insert(session.id.clone(), Arc::new(Mutex::new(session)));
    }

    fn get(&self, session_id: &str) -> Option<ScanSession> {
        let entry = self.entry(session_id)?;
        let session = entry.lock().unwrap_or_else(|e| e.into_inner());
        Some(session.clone())
    }

    fn with_session_mut<T, F>(&self, session_id: &str, f: F) -> Option<T>
    where
        F: FnOnce(&mut ScanSession) -> T,
    {
        let entry = self.entry(session_id)?;
        let mut session = entry.lock().unwrap_or_else(|e| e.into_inner());
        Some(f(&mut session))
    }

    fn list_active(&self) -> Vec<ScanSession> {
        let entries: Vec<Arc<Mutex<ScanSession>>> = {
            let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
            sessions.values().cloned().collect()
        };

        entries
            .iter()
            .map(|entry| entry.lock().unwrap_or_else(|e| e.into_inner()).clone())
            .filter(|session| session.is_active)
            .collect()
    }
}

/// 工作階段統計
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_scans: usize,
    pub successful_scans: usize,
    pub failed_scans: usize,
    /// 成功掃描中不重複的品項數
    pub unique_items: usize,
    /// 持續時間（分鐘，進行中則計至目前時間）
    pub duration_minutes: i64,
}

/// 掃描工作階段管理器
pub struct ScanSessionManager<R, C, G>
where
    R: SessionRepository,
    C: Clock,
    G: IdGenerator,
{
    repository: R,
    clock: C,
    ids: G,
}

impl<R, C, G> ScanSessionManager<R, C, G>
where
    R: SessionRepository,
    C: Clock,
    G: IdGenerator,
{
    pub fn new(repository: R, clock: C, ids: G) -> Self {
        Self {
            repository,
            clock,
            ids,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// 開始新的工作階段
    pub fn start_session(
        &self,
        session_type: ScanSessionType,
        location_id: String,
        user_id: String,
    ) -> ScanSession {
        let session = ScanSession::new(
            self.ids.next_id(),
            session_type,
            location_id,
            user_id,
            self.clock.now(),
        );

        tracing::info!(
            "開始掃描工作階段 {} ({:?}, 儲位 {}, 人員 {})",
            session.id,
            session.session_type,
            session.location_id,
            session.user_id
        );

        self.repository.insert(session.clone());
        session
    }

    /// 加入掃描結果；工作階段不存在或已結束時回傳 `None`
    pub fn add_scan(&self, session_id: &str, result: ScanResult) -> Option<ScanSession> {
        match self.try_add_scan(session_id, result) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::debug!("掃描未加入: {}", e);
                None
            }
        }
    }

    /// 加入掃描結果（嚴格版本）
    ///
    /// 回傳的快照會複製全部掃描紀錄；連續大量掃描請改用 [`Self::append_scan`]。
    pub fn try_add_scan(&self, session_id: &str, result: ScanResult) -> Result<ScanSession> {
        self.with_active_session(session_id, |session| {
            session.scans.push(result);
            session.clone()
        })
    }

    /// 加入掃描結果，回傳目前掃描筆數
    pub fn append_scan(&self, session_id: &str, result: ScanResult) -> Result<usize> {
        self.with_active_session(session_id, |session| {
            session.scans.push(result);
            session.scans.len()
        })
    }

    /// 清理並驗證條碼後加入掃描結果，回傳記錄的掃描結果
    ///
    /// 條碼有效且 `item_lookup` 找到品項時記為成功，否則記為失敗。
    pub fn record_scan<F>(&self, session_id: &str, raw_barcode: &str, item_lookup: F) -> Option<ScanResult>
    where
        F: Fn(&str) -> Option<String>,
    {
        let barcode = clean_barcode(raw_barcode);
        let validation = validate_barcode(&barcode);
        let timestamp = self.clock.now();

        let item_id = if validation.is_valid {
            item_lookup(&barcode)
        } else {
            None
        };

        let result = match item_id {
            Some(item_id) => ScanResult::matched(barcode, validation.format, item_id, timestamp),
            None => ScanResult::failed(barcode, validation.format, timestamp),
        };

        match self.append_scan(session_id, result.clone()) {
            Ok(_) => Some(result),
            Err(e) => {
                tracing::debug!("掃描未加入: {}", e);
                None
            }
        }
    }

    /// 結束工作階段；重複呼叫回傳已結束的工作階段且不變更結束時間
    pub fn end_session(&self, session_id: &str) -> Option<ScanSession> {
        let now = self.clock.now();

        self.repository.with_session_mut(session_id, |session| {
            if session.is_active {
                session.is_active = false;
                session.end_time = Some(now);

                tracing::info!(
                    "結束掃描工作階段 {}：共 {} 筆掃描",
                    session.id,
                    session.scans.len()
                );
            }
            session.clone()
        })
    }

    /// 工作階段統計
    pub fn session_stats(&self, session_id: &str) -> Option<SessionStats> {
        let session = self.repository.get(session_id)?;
        let end = session.end_time.unwrap_or_else(|| self.clock.now());

        let total_scans = session.scans.len();
        let successful_scans = session.successful_scans();

        Some(SessionStats {
            total_scans,
            successful_scans,
            failed_scans: total_scans - successful_scans,
            unique_items: session.unique_items(),
            duration_minutes: (end - session.start_time).num_minutes(),
        })
    }

    pub fn get_session(&self, session_id: &str) -> Option<ScanSession> {
        self.repository.get(session_id)
    }

    /// 進行中的工作階段（依開始時間排序）
    pub fn active_sessions(&self) -> Vec<ScanSession> {
        let mut sessions = self.repository.list_active();
        sessions.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.id.cmp(&b.id)));
        sessions
    }

    fn with_active_session<T, F>(&self, session_id: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut ScanSession) -> T,
    {
        self.repository
            .with_session_mut(session_id, |session| {
                if !session.is_active {
                    return Err(StockError::SessionEnded(session.id.clone()));
                }
                Ok(f(session))
            })
            .unwrap_or_else(|| Err(StockError::SessionNotFound(session_id.to_string())))
    }
}
