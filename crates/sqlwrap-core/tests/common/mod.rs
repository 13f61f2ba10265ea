//! Shared fixtures: an in-memory mock driver and a recording observer.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use sqlwrap_core::{
    BoxError, Conn, ConnBeginTx, ConnExec, ConnPing, ConnPrepare, ConnQuery, Context, Driver,
    DriverError, ExecResult, Handle, NamedValue, Observer, OperationKind, Rows, Stmt, StmtExec,
    StmtQuery, Tx, TxOptions, Value,
};

// ─── Context marker ───────────────────────────────────────────────────────────

/// Value an observer attaches to the context so later hops can see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker(pub usize);

fn marker(ctx: &Context) -> Option<usize> {
    ctx.value::<Marker>().map(|m| m.0)
}

// ─── Recording observer ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Finished {
    pub kind: OperationKind,
    pub query: String,
    pub error: Option<String>,
}

#[derive(Default)]
struct RecorderLog {
    started: Mutex<Vec<(OperationKind, Option<usize>)>>,
    finished: Mutex<Vec<Finished>>,
}

/// Not thread safe in any interesting way: it just appends under a lock.
#[derive(Clone, Default)]
pub struct Recorder {
    tag: Option<usize>,
    log: Arc<RecorderLog>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A recorder that also attaches `Marker(id)` to the context it returns.
    pub fn tagging(id: usize) -> Self {
        Self {
            tag: Some(id),
            log: Arc::default(),
        }
    }

    pub fn observer(&self) -> Arc<dyn Observer> {
        Arc::new(self.clone())
    }

    pub fn started(&self) -> Vec<OperationKind> {
        self.log.started.lock().unwrap().iter().map(|(k, _)| *k).collect()
    }

    /// Marker each `start` call saw in its incoming context.
    pub fn seen_markers(&self) -> Vec<Option<usize>> {
        self.log.started.lock().unwrap().iter().map(|(_, m)| *m).collect()
    }

    pub fn finished(&self) -> Vec<Finished> {
        self.log.finished.lock().unwrap().clone()
    }

    pub fn finished_kinds(&self) -> Vec<OperationKind> {
        self.finished().into_iter().map(|f| f.kind).collect()
    }
}

struct RecorderHandle {
    kind: OperationKind,
    query: String,
    log: Arc<RecorderLog>,
}

impl Observer for Recorder {
    fn start(&self, ctx: Context, kind: OperationKind, query: &str) -> (Box<dyn Handle>, Context) {
        self.log.started.lock().unwrap().push((kind, marker(&ctx)));
        let handle = RecorderHandle {
            kind,
            query: query.to_string(),
            log: self.log.clone(),
        };
        let ctx = match self.tag {
            Some(id) => ctx.with_value(Marker(id)),
            None => ctx,
        };
        (Box::new(handle), ctx)
    }
}

impl Handle for RecorderHandle {
    fn finish(self: Box<Self>, err: Option<&DriverError>) {
        self.log.finished.lock().unwrap().push(Finished {
            kind: self.kind,
            query: self.query,
            error: err.map(|e| e.to_string()),
        });
    }
}

// ─── Mock driver ──────────────────────────────────────────────────────────────

/// Which optional capabilities the mock connection and statements expose.
#[derive(Debug, Clone, Copy)]
pub struct Caps {
    pub begin_tx: bool,
    pub prepare: bool,
    pub exec: bool,
    pub ping: bool,
    pub query: bool,
    pub stmt_exec: bool,
    pub stmt_query: bool,
}

impl Default for Caps {
    fn default() -> Self {
        Self {
            begin_tx: true,
            prepare: true,
            exec: true,
            ping: true,
            query: true,
            stmt_exec: true,
            stmt_query: true,
        }
    }
}

impl Caps {
    pub fn none() -> Self {
        Self {
            begin_tx: false,
            prepare: false,
            exec: false,
            ping: false,
            query: false,
            stmt_exec: false,
            stmt_query: false,
        }
    }
}

#[derive(Debug)]
pub struct MockFailure {
    pub code: u32,
}

impl std::fmt::Display for MockFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "mock failure {}", self.code)
    }
}

impl std::error::Error for MockFailure {}

/// Address of the error object behind a `DriverError::Driver`.
pub fn error_addr(err: &DriverError) -> Option<usize> {
    match err {
        DriverError::Driver(inner) => Some(&**inner as *const _ as *const () as usize),
        _ => None,
    }
}

#[derive(Default)]
pub struct MockState {
    pub caps: Caps,
    pub rows: Vec<Vec<Value>>,
    pub columns: Vec<String>,
    pub fail_open: bool,
    /// Ping never completes.
    pub stall_ping: bool,
    /// Returned (once) by the next connection-level exec.
    pub fail_exec: Mutex<Option<DriverError>>,
    /// Address of the last injected failure, for identity checks.
    pub failure_addr: Mutex<Option<usize>>,
    /// Every real call, with the marker found in the context it received.
    pub calls: Mutex<Vec<(&'static str, Option<usize>)>>,
}

impl MockState {
    fn record(&self, call: &'static str, ctx: Option<&Context>) {
        self.calls
            .lock()
            .unwrap()
            .push((call, ctx.and_then(marker)));
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().iter().map(|(c, _)| *c).collect()
    }

    pub fn markers(&self) -> Vec<Option<usize>> {
        self.calls.lock().unwrap().iter().map(|(_, m)| *m).collect()
    }

    /// Arm the next exec to fail with a driver error; returns its address.
    pub fn arm_exec_failure(&self, code: u32) -> usize {
        let boxed: BoxError = Box::new(MockFailure { code });
        let addr = &*boxed as *const _ as *const () as usize;
        *self.fail_exec.lock().unwrap() = Some(DriverError::Driver(boxed));
        *self.failure_addr.lock().unwrap() = Some(addr);
        addr
    }
}

#[derive(Clone, Default)]
pub struct MockDriver {
    pub state: Arc<MockState>,
}

impl MockDriver {
    pub fn new(state: MockState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    pub fn with_caps(caps: Caps) -> Self {
        Self::new(MockState {
            caps,
            ..Default::default()
        })
    }

    pub fn with_rows(columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        Self::new(MockState {
            caps: Caps::default(),
            rows,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        })
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn open(&self, name: &str) -> Result<Box<dyn Conn>, DriverError> {
        if self.state.fail_open {
            return Err(DriverError::driver(format!("cannot open {name}")));
        }
        self.state.record("open", None);
        Ok(Box::new(MockConn {
            state: self.state.clone(),
        }))
    }
}

pub struct MockConn {
    state: Arc<MockState>,
}

#[async_trait]
impl Conn for MockConn {
    async fn prepare(&self, query: &str) -> Result<Box<dyn Stmt>, DriverError> {
        self.state.record("prepare", None);
        Ok(Box::new(MockStmt::new(self.state.clone(), query)))
    }

    async fn begin(&self) -> Result<Box<dyn Tx>, DriverError> {
        self.state.record("begin", None);
        Ok(Box::new(MockTx {
            state: self.state.clone(),
        }))
    }

    async fn close(&self) -> Result<(), DriverError> {
        self.state.record("close", None);
        Ok(())
    }

    fn as_begin_tx(&self) -> Option<&dyn ConnBeginTx> {
        self.state.caps.begin_tx.then_some(self as &dyn ConnBeginTx)
    }

    fn as_prepare(&self) -> Option<&dyn ConnPrepare> {
        self.state.caps.prepare.then_some(self as &dyn ConnPrepare)
    }

    fn as_exec(&self) -> Option<&dyn ConnExec> {
        self.state.caps.exec.then_some(self as &dyn ConnExec)
    }

    fn as_ping(&self) -> Option<&dyn ConnPing> {
        self.state.caps.ping.then_some(self as &dyn ConnPing)
    }

    fn as_query(&self) -> Option<&dyn ConnQuery> {
        self.state.caps.query.then_some(self as &dyn ConnQuery)
    }
}

#[async_trait]
impl ConnBeginTx for MockConn {
    async fn begin_tx(&self, ctx: &Context, _opts: TxOptions) -> Result<Box<dyn Tx>, DriverError> {
        self.state.record("begin_tx", Some(ctx));
        Ok(Box::new(MockTx {
            state: self.state.clone(),
        }))
    }
}

#[async_trait]
impl ConnPrepare for MockConn {
    async fn prepare_context(&self, ctx: &Context, query: &str) -> Result<Box<dyn Stmt>, DriverError> {
        self.state.record("prepare_context", Some(ctx));
        Ok(Box::new(MockStmt::new(self.state.clone(), query)))
    }
}

#[async_trait]
impl ConnExec for MockConn {
    async fn exec_context(
        &self,
        ctx: &Context,
        query: &str,
        args: &[NamedValue],
    ) -> Result<Box<dyn ExecResult>, DriverError> {
        self.state.record("exec_context", Some(ctx));
        if let Some(err) = self.state.fail_exec.lock().unwrap().take() {
            return Err(err);
        }
        Ok(Box::new(MockResult {
            last_id: if query.starts_with("INSERT") { 1 } else { 0 },
            affected: args.len() as i64,
        }))
    }
}

#[async_trait]
impl ConnPing for MockConn {
    async fn ping(&self, ctx: &Context) -> Result<(), DriverError> {
        self.state.record("ping", Some(ctx));
        if self.state.stall_ping {
            std::future::pending::<()>().await;
        }
        Ok(())
    }
}

#[async_trait]
impl ConnQuery for MockConn {
    async fn query_context(
        &self,
        ctx: &Context,
        _query: &str,
        _args: &[NamedValue],
    ) -> Result<Box<dyn Rows>, DriverError> {
        self.state.record("query_context", Some(ctx));
        Ok(Box::new(MockRows::new(&self.state)))
    }
}

pub struct MockTx {
    state: Arc<MockState>,
}

#[async_trait]
impl Tx for MockTx {
    async fn commit(&self) -> Result<(), DriverError> {
        self.state.record("commit", None);
        Ok(())
    }

    async fn rollback(&self) -> Result<(), DriverError> {
        self.state.record("rollback", None);
        Err(DriverError::driver("transaction already committed"))
    }
}

pub struct MockStmt {
    state: Arc<MockState>,
    query: String,
}

impl MockStmt {
    fn new(state: Arc<MockState>, query: &str) -> Self {
        Self {
            state,
            query: query.to_string(),
        }
    }
}

#[async_trait]
impl Stmt for MockStmt {
    async fn close(&self) -> Result<(), DriverError> {
        self.state.record("stmt_close", None);
        Ok(())
    }

    fn num_input(&self) -> Option<usize> {
        Some(self.query.matches('?').count())
    }

    async fn exec(&self, _args: &[Value]) -> Result<Box<dyn ExecResult>, DriverError> {
        self.state.record("stmt_exec", None);
        Ok(Box::new(MockResult {
            last_id: 0,
            affected: 0,
        }))
    }

    async fn query(&self, _args: &[Value]) -> Result<Box<dyn Rows>, DriverError> {
        self.state.record("stmt_query", None);
        Ok(Box::new(MockRows::new(&self.state)))
    }

    fn as_exec(&self) -> Option<&dyn StmtExec> {
        self.state.caps.stmt_exec.then_some(self as &dyn StmtExec)
    }

    fn as_query(&self) -> Option<&dyn StmtQuery> {
        self.state.caps.stmt_query.then_some(self as &dyn StmtQuery)
    }
}

#[async_trait]
impl StmtExec for MockStmt {
    async fn exec_context(
        &self,
        ctx: &Context,
        args: &[NamedValue],
    ) -> Result<Box<dyn ExecResult>, DriverError> {
        self.state.record("stmt_exec_context", Some(ctx));
        Ok(Box::new(MockResult {
            last_id: 42,
            affected: args.len() as i64,
        }))
    }
}

#[async_trait]
impl StmtQuery for MockStmt {
    async fn query_context(&self, ctx: &Context, _args: &[NamedValue]) -> Result<Box<dyn Rows>, DriverError> {
        self.state.record("stmt_query_context", Some(ctx));
        Ok(Box::new(MockRows::new(&self.state)))
    }
}

pub struct MockResult {
    last_id: i64,
    affected: i64,
}

impl ExecResult for MockResult {
    fn last_insert_id(&self) -> Result<i64, DriverError> {
        if self.last_id == 0 {
            return Err(DriverError::driver("last insert id is not available"));
        }
        Ok(self.last_id)
    }

    fn rows_affected(&self) -> Result<i64, DriverError> {
        Ok(self.affected)
    }
}

pub struct MockRows {
    columns: Vec<String>,
    data: Vec<Vec<Value>>,
    pos: usize,
    closed: bool,
}

impl MockRows {
    fn new(state: &MockState) -> Self {
        Self {
            columns: state.columns.clone(),
            data: state.rows.clone(),
            pos: 0,
            closed: false,
        }
    }
}

#[async_trait]
impl Rows for MockRows {
    fn columns(&self) -> Vec<String> {
        self.columns.clone()
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        self.closed = true;
        Ok(())
    }

    async fn next(&mut self, dest: &mut [Value]) -> Result<(), DriverError> {
        if self.closed || self.pos >= self.data.len() {
            return Err(DriverError::EndOfRows);
        }
        for (slot, value) in dest.iter_mut().zip(&self.data[self.pos]) {
            *slot = value.clone();
        }
        self.pos += 1;
        Ok(())
    }
}
