//! Scripted executor shared by the integration tests.

#![allow(dead_code)]

use sqlforge::{CompiledStatement, Executor, OrmError, OrmResult, Row, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

pub enum Reply {
    Rows(Vec<Row>),
    Affected(u64),
}

#[derive(Default)]
pub struct ScriptedExecutor {
    calls: Mutex<Vec<CompiledStatement>>,
    replies: Mutex<VecDeque<Reply>>,
}

impl ScriptedExecutor {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            calls: Mutex::default(),
            replies: Mutex::new(replies.into_iter().collect()),
        }
    }

    pub fn calls(&self) -> Vec<CompiledStatement> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, sql: &str, params: &[Value]) -> Option<Reply> {
        self.calls
            .lock()
            .unwrap()
            .push(CompiledStatement::new(sql, params.to_vec()));
        self.replies.lock().unwrap().pop_front()
    }
}

impl Executor for ScriptedExecutor {
    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<Row>> {
        match self.record(sql, params) {
            Some(Reply::Rows(rows)) => Ok(rows),
            _ => Err(OrmError::Other(format!("unexpected query: {sql}"))),
        }
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<u64> {
        match self.record(sql, params) {
            Some(Reply::Affected(n)) => Ok(n),
            _ => Err(OrmError::Other(format!("unexpected execute: {sql}"))),
        }
    }
}
