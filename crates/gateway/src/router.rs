//! Route declarations, template compilation, and lookup.
//!
//! Matching is a linear scan in declaration order; the first structural and
//! method match wins. Overlapping templates resolve by that order, which is
//! part of the public contract: reordering declarations is a behavioral
//! change.

use std::sync::Arc;

use axum::http::Method;

use orgkit_auth::AuthRequirement;

use crate::config::normalize_base_path;
use crate::handler::UseCaseHandler;
use crate::validate::Validator;

/// One route declaration: the (method, template, auth requirement) triple
/// bound to a handler, plus an optional declared input shape.
///
/// Templates mark capturing segments with a leading `:`
/// (`/organizations/:organizationId/members/:memberId`); every other segment
/// matches literally.
#[derive(Clone)]
pub struct Route {
    method: Method,
    template: String,
    auth: AuthRequirement,
    handler: Arc<dyn UseCaseHandler>,
    validator: Option<Arc<dyn Validator>>,
}

impl Route {
    pub fn new(
        method: Method,
        template: impl Into<String>,
        auth: AuthRequirement,
        handler: Arc<dyn UseCaseHandler>,
    ) -> Self {
        Self {
            method,
            template: template.into(),
            auth,
            handler,
            validator: None,
        }
    }

    /// Attach the declared input shape for this route.
    pub fn with_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validator = Some(validator);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A route compiled for matching: anchored (exact segment count), method-aware.
/// Derived 1:1 from a declaration at table-build time; never mutated after.
pub struct CompiledRoute {
    method: Method,
    template: String,
    segments: Vec<Segment>,
    auth: AuthRequirement,
    handler: Arc<dyn UseCaseHandler>,
    validator: Option<Arc<dyn Validator>>,
}

impl CompiledRoute {
    fn compile(base_path: &str, route: Route) -> Self {
        let template = format!("{}{}", base_path, route.template);
        let segments = split_segments(&template)
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) if !name.is_empty() => Segment::Param(name.to_string()),
                _ => Segment::Literal(segment.to_string()),
            })
            .collect();
        Self {
            method: route.method,
            template,
            segments,
            auth: route.auth,
            handler: route.handler,
            validator: route.validator,
        }
    }

    /// Match a concrete path against this route's segments, binding parameter
    /// values positionally. Values are raw segment text.
    fn match_path(&self, path: &str) -> Option<Vec<(String, String)>> {
        let parts: Vec<&str> = split_segments(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = Vec::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) => {
                    if literal != part {
                        return None;
                    }
                }
                Segment::Param(name) => params.push((name.clone(), part.to_string())),
            }
        }
        Some(params)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn auth(&self) -> AuthRequirement {
        self.auth
    }

    pub fn handler(&self) -> &Arc<dyn UseCaseHandler> {
        &self.handler
    }

    pub fn validator(&self) -> Option<&Arc<dyn Validator>> {
        self.validator.as_ref()
    }
}

impl core::fmt::Debug for CompiledRoute {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CompiledRoute")
            .field("method", &self.method)
            .field("template", &self.template)
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

/// A successful lookup: the matched route and its parameter bindings, in
/// template order.
pub struct RouteMatch<'a> {
    pub route: &'a CompiledRoute,
    pub params: Vec<(String, String)>,
}

/// Ordered, immutable route table. Built once at startup; shared read-only
/// across concurrent requests.
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
}

impl RouteTable {
    pub fn builder(base_path: impl Into<String>) -> RouteTableBuilder {
        RouteTableBuilder {
            base_path: normalize_base_path(&base_path.into()),
            routes: Vec::new(),
        }
    }

    /// Resolve a (method, pathname) to the first matching route, or none.
    ///
    /// Method comparison is effectively case-insensitive because `Method`
    /// values are normalized at parse time; path literals are case-sensitive.
    pub fn find(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        self.routes.iter().find_map(|route| {
            if route.method != *method {
                return None;
            }
            route
                .match_path(path)
                .map(|params| RouteMatch { route, params })
        })
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

pub struct RouteTableBuilder {
    base_path: String,
    routes: Vec<CompiledRoute>,
}

impl RouteTableBuilder {
    /// Register a route. Registration order is the tie-break for overlapping
    /// templates.
    pub fn route(mut self, route: Route) -> Self {
        self.routes
            .push(CompiledRoute::compile(&self.base_path, route));
        self
    }

    pub fn build(self) -> RouteTable {
        RouteTable {
            routes: self.routes,
        }
    }
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}
