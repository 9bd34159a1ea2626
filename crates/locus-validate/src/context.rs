//! Shared context handed to every validator plugin
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license

use crate::issue::{IssueCategory, Severity, ValidationIssue};
use locus_core::path::{segments_to_pointer, segments_to_property_path};
use locus_core::{ErrorFieldDetector, PathConverter, PathFormat, PathSegment, PositionMap};
use serde_json::Value;

/// Everything a plugin may consult while validating one document.
///
/// The breadcrumb is the only mutable part: plugins walking the document push
/// and pop segments so that [`ValidationContext::issue`] anchors findings at
/// the node currently being inspected.
pub struct ValidationContext<'a> {
    file_path: &'a str,
    source: &'a str,
    value: &'a Value,
    positions: &'a PositionMap,
    converter: &'a PathConverter,
    detector: &'a ErrorFieldDetector,
    breadcrumb: Vec<PathSegment>,
}

impl<'a> ValidationContext<'a> {
    pub fn new(
        file_path: &'a str,
        source: &'a str,
        value: &'a Value,
        positions: &'a PositionMap,
        converter: &'a PathConverter,
        detector: &'a ErrorFieldDetector,
    ) -> Self {
        Self {
            file_path,
            source,
            value,
            positions,
            converter,
            detector,
            breadcrumb: Vec::new(),
        }
    }

    pub fn file_path(&self) -> &'a str {
        self.file_path
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// The parsed document root
    pub fn value(&self) -> &'a Value {
        self.value
    }

    pub fn positions(&self) -> &'a PositionMap {
        self.positions
    }

    pub fn converter(&self) -> &'a PathConverter {
        self.converter
    }

    pub fn detector(&self) -> &'a ErrorFieldDetector {
        self.detector
    }

    pub fn breadcrumb(&self) -> &[PathSegment] {
        &self.breadcrumb
    }

    pub fn depth(&self) -> usize {
        self.breadcrumb.len()
    }

    pub fn enter_key(&mut self, key: impl Into<String>) {
        self.breadcrumb.push(PathSegment::Key(key.into()));
    }

    pub fn enter_index(&mut self, index: usize) {
        self.breadcrumb.push(PathSegment::Index(index));
    }

    /// Pop the innermost breadcrumb segment
    pub fn leave(&mut self) -> Option<PathSegment> {
        self.breadcrumb.pop()
    }

    pub fn current_pointer(&self) -> String {
        segments_to_pointer(&self.breadcrumb)
    }

    pub fn current_path(&self) -> String {
        segments_to_property_path(&self.breadcrumb)
    }

    /// The value under the breadcrumb, if the breadcrumb still resolves
    pub fn current_value(&self) -> Option<&'a Value> {
        self.value.pointer(&self.current_pointer())
    }

    /// An issue anchored at the current breadcrumb
    pub fn issue(&self, category: IssueCategory, severity: Severity, message: impl Into<String>) -> ValidationIssue {
        self.issue_at(&self.current_pointer(), category, severity, message)
    }

    /// An issue anchored at `pointer`.
    ///
    /// Line and column come from the Position Map (nearest recorded ancestor
    /// when the pointer itself was not recorded, line 1 otherwise); the field
    /// name comes from the Error Field Detector.
    pub fn issue_at(
        &self,
        pointer: &str,
        category: IssueCategory,
        severity: Severity,
        message: impl Into<String>,
    ) -> ValidationIssue {
        let message = message.into();
        let position = self
            .positions
            .find_by_pointer(pointer)
            .position
            .unwrap_or_else(locus_core::PositionInfo::start_of_document);
        let path = self
            .converter
            .convert_from(pointer, Some(PathFormat::JsonPointer), PathFormat::PropertyPath)
            .map(|conversion| conversion.result)
            .unwrap_or_else(|_| pointer.to_string());
        let detected = self.detector.detect(&message, pointer);

        let mut issue = ValidationIssue::new(category, severity, message)
            .with_location(pointer, path)
            .with_position(position.line, position.column);
        if let Some(field) = detected.field {
            issue = issue.with_field(field);
        }
        issue
    }
}
