//! Common test utilities for impala-hook integration tests.
//!
//! Provides an in-memory client that records every call, so tests can drive
//! the hook end to end without an Impala server.

#![allow(dead_code)]

use async_trait::async_trait;
use impala_hook::client::{ColumnDescription, ConnectArgs, Cursor, DbConnection, ImpalaClient, Row};
use impala_hook::ClientError;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// A call observed by the fake client.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Connect(ConnectArgs),
    Execute(String, Vec<Value>),
    Commit,
    Close,
}

/// Client returning canned results for every statement.
#[derive(Clone, Default)]
pub struct FakeClient {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    pub fail_connect: Option<ClientError>,
    pub fail_execute: Option<ClientError>,
    pub fail_commit: Option<String>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl FakeClient {
    pub fn with_result(columns: &[&str], rows: Vec<Row>) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
            ..Default::default()
        }
    }

    pub fn failing(error: ClientError) -> Self {
        Self {
            fail_connect: Some(error),
            ..Default::default()
        }
    }

    /// Every statement fails with `error`.
    pub fn failing_execute(error: ClientError) -> Self {
        Self {
            fail_execute: Some(error),
            ..Default::default()
        }
    }

    /// Every commit fails with a transaction error carrying `message`.
    pub fn failing_commit(message: &str) -> Self {
        Self {
            fail_commit: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ImpalaClient for FakeClient {
    async fn connect(&self, args: ConnectArgs) -> Result<Box<dyn DbConnection>, ClientError> {
        self.record(Call::Connect(args));
        if let Some(err) = &self.fail_connect {
            return Err(err.clone());
        }
        Ok(Box::new(FakeConnection {
            client: self.clone(),
            closed: false,
        }))
    }
}

struct FakeConnection {
    client: FakeClient,
    closed: bool,
}

impl FakeConnection {
    fn ensure_open(&self) -> Result<(), ClientError> {
        if self.closed {
            Err(ClientError::ConnectionClosed)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DbConnection for FakeConnection {
    async fn cursor(&mut self) -> Result<Box<dyn Cursor>, ClientError> {
        self.ensure_open()?;
        Ok(Box::new(FakeCursor {
            client: self.client.clone(),
            pending: Vec::new(),
            executed: false,
        }))
    }

    async fn commit(&mut self) -> Result<(), ClientError> {
        self.ensure_open()?;
        self.client.record(Call::Commit);
        match &self.client.fail_commit {
            Some(message) => Err(ClientError::TransactionError(message.clone())),
            None => Ok(()),
        }
    }

    async fn close(&mut self) -> Result<(), ClientError> {
        self.ensure_open()?;
        self.client.record(Call::Close);
        self.closed = true;
        Ok(())
    }
}

struct FakeCursor {
    client: FakeClient,
    pending: Vec<Row>,
    executed: bool,
}

#[async_trait]
impl Cursor for FakeCursor {
    async fn execute(&mut self, sql: &str, params: &[Value]) -> Result<(), ClientError> {
        self.client
            .record(Call::Execute(sql.to_string(), params.to_vec()));
        if let Some(err) = &self.client.fail_execute {
            return Err(err.clone());
        }
        self.pending = self.client.rows.clone();
        self.executed = true;
        Ok(())
    }

    async fn fetchone(&mut self) -> Result<Option<Row>, ClientError> {
        if !self.executed {
            return Err(ClientError::NoResultSet("execute first".to_string()));
        }
        if self.pending.is_empty() {
            Ok(None)
        } else {
            Ok(Some(self.pending.remove(0)))
        }
    }

    async fn fetchall(&mut self) -> Result<Vec<Row>, ClientError> {
        if !self.executed {
            return Err(ClientError::NoResultSet("execute first".to_string()));
        }
        Ok(std::mem::take(&mut self.pending))
    }

    fn description(&self) -> Option<Vec<ColumnDescription>> {
        if self.client.columns.is_empty() {
            None
        } else {
            Some(
                self.client
                    .columns
                    .iter()
                    .map(|c| ColumnDescription::new(c).with_type_code("STRING"))
                    .collect(),
            )
        }
    }

    fn rowcount(&self) -> i64 {
        self.pending.len() as i64
    }
}
