//! Test doubles for the tool layer.

use super::{LayerInfo, LayerLister, ToolInvocation, ToolRunner};
use crate::error::{GisError, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// Records every invocation; optionally fails the Nth call (0-based).
#[derive(Default)]
pub(crate) struct RecordingRunner {
    calls: Mutex<Vec<ToolInvocation>>,
    fail_on: Option<usize>,
}

impl RecordingRunner {
    pub(crate) fn failing_on(index: usize) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: Some(index),
        }
    }

    pub(crate) fn calls(&self) -> Vec<ToolInvocation> {
        self.calls.lock().unwrap().clone()
    }
}

impl ToolRunner for RecordingRunner {
    async fn run(&self, invocation: &ToolInvocation) -> Result<()> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(invocation.clone());
            calls.len() - 1
        };
        if self.fail_on == Some(index) {
            return Err(GisError::ToolFailed {
                program: invocation.program_name(),
                status: "exit status: 1".into(),
            });
        }
        Ok(())
    }
}

/// Returns fixed layer lists keyed by geodatabase file name.
#[derive(Default)]
pub(crate) struct StaticLister {
    layers: HashMap<String, Vec<LayerInfo>>,
}

impl StaticLister {
    pub(crate) fn with(mut self, gdb_name: &str, layers: &[&str]) -> Self {
        self.layers.insert(
            gdb_name.to_string(),
            layers.iter().map(|l| LayerInfo::new(*l)).collect(),
        );
        self
    }
}

impl LayerLister for StaticLister {
    async fn list_layers(&self, gdb: &Path) -> Result<Vec<LayerInfo>> {
        let name = gdb
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.layers
            .get(&name)
            .cloned()
            .ok_or_else(|| GisError::ToolFailed {
                program: "ogrinfo".into(),
                status: format!("cannot open {}", name),
            })
    }
}
