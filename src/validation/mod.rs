//! Scene export validation surface.
//!
//! Validation happens upstream of loading, when a bundle is exported. The
//! loader never consumes it; this module only defines the shapes a host
//! validator reports in and the one stateless rule shared with runtime code.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Shader families a bundle may reference.
const SUPPORTED_SHADER_PREFIXES: &[&str] = &[
    "Universal Render Pipeline/",
    "Unlit/",
    "UI/",
    "Sprites/",
    "Skybox/",
    "Hidden/InternalErrorShader",
];

/// Kinds of problems that prevent or affect export of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    /// The project uses a render pipeline other than URP
    UnsupportedRenderPipeline,
    /// A material uses a shader outside the supported families
    UnsupportedShader,
    /// A scene object carries a user-authored script
    CustomScriptFound,
    CameraFound,
    /// Realtime or mixed light. Warning only.
    NonBakedLight,
    EventSystemFound,
    NoUserAreaProviderFound,
    MultipleUserAreaProvidersFound,
    AudioListenerFound,
    DisallowedSceneName,
}

impl ViolationKind {
    /// Whether violations of this kind block export by default.
    pub fn prevents_export_by_default(&self) -> bool {
        !matches!(self, Self::NonBakedLight)
    }
}

type Resolver = Box<dyn FnMut(Option<&str>) + Send>;

/// A single problem found in a scene.
pub struct Violation {
    pub kind: ViolationKind,
    pub prevents_export: bool,
    pub description: String,
    /// Identifier of the scene object involved, if any
    pub object: Option<String>,
    auto_resolve_message: Option<String>,
    resolver: Option<Resolver>,
}

impl Violation {
    pub fn new(
        kind: ViolationKind,
        prevents_export: bool,
        description: impl Into<String>,
        object: Option<String>,
    ) -> Self {
        Self {
            kind,
            prevents_export,
            description: description.into(),
            object,
            auto_resolve_message: None,
            resolver: None,
        }
    }

    /// Attach an automatic fix, with the confirmation message shown before running it.
    pub fn with_auto_resolver<F>(mut self, message: impl Into<String>, resolver: F) -> Self
    where
        F: FnMut(Option<&str>) + Send + 'static,
    {
        self.auto_resolve_message = Some(message.into());
        self.resolver = Some(Box::new(resolver));
        self
    }

    pub fn can_be_auto_resolved(&self) -> bool {
        self.resolver.is_some()
    }

    pub fn auto_resolve_message(&self) -> Option<&str> {
        self.auto_resolve_message.as_deref()
    }

    /// Run the attached fix against the violation's object. Returns whether a fix ran.
    pub fn auto_resolve(&mut self) -> bool {
        match self.resolver.as_mut() {
            Some(resolve) => {
                resolve(self.object.as_deref());
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Violation")
            .field("kind", &self.kind)
            .field("prevents_export", &self.prevents_export)
            .field("description", &self.description)
            .field("object", &self.object)
            .field("can_be_auto_resolved", &self.can_be_auto_resolved())
            .finish()
    }
}

/// Produces the violations present in the scene being exported.
pub trait SceneValidator {
    fn validate(&self) -> Vec<Violation>;
}

/// Whether any violation blocks export.
pub fn blocks_export(violations: &[Violation]) -> bool {
    violations.iter().any(|v| v.prevents_export)
}

/// Whether `shader_name` belongs to a supported shader family.
pub fn is_supported_shader(shader_name: &str) -> bool {
    SUPPORTED_SHADER_PREFIXES
        .iter()
        .any(|prefix| shader_name.starts_with(prefix))
}
