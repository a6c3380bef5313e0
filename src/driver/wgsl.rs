//! WGSL front end for shader objects.
//!
//! [`compile`] parses and validates one stage with naga, producing the
//! compile status and info log of a shader object. [`link`] checks that a
//! vertex and a fragment module fit together: each has an entry point of the
//! right stage, and every fragment input location is written by the vertex
//! stage with the same scalar or vector type.

use std::fmt;

use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{Binding, Handle, Module, ScalarKind, Type, TypeInner};

use super::ShaderStage;

/// Shader capabilities available on a device created with default features.
pub fn device_capabilities() -> Capabilities {
    Capabilities::default()
}

/// Scalar or vector type of one user-defined stage input or output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceType {
    pub kind: ScalarKind,
    /// Width of one component in bytes.
    pub width: u8,
    /// 1 for scalars.
    pub components: u32,
}

impl InterfaceType {
    fn from_inner(inner: &TypeInner) -> Option<Self> {
        match *inner {
            TypeInner::Scalar(scalar) => Some(Self {
                kind: scalar.kind,
                width: scalar.width,
                components: 1,
            }),
            TypeInner::Vector { size, scalar } => Some(Self {
                kind: scalar.kind,
                width: scalar.width,
                components: size as u32,
            }),
            _ => None,
        }
    }

    /// Whether a `Float32` vertex format can feed this input.
    #[must_use]
    pub fn accepts_f32(&self) -> bool {
        self.kind == ScalarKind::Float && self.width == 4
    }
}

impl fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scalar = match self.kind {
            ScalarKind::Float | ScalarKind::AbstractFloat => "f",
            ScalarKind::Sint | ScalarKind::AbstractInt => "i",
            ScalarKind::Uint => "u",
            ScalarKind::Bool => "bool",
        };
        let scalar = if self.kind == ScalarKind::Bool {
            scalar.to_string()
        } else {
            format!("{scalar}{}", u32::from(self.width) * 8)
        };
        if self.components == 1 {
            f.write_str(&scalar)
        } else {
            write!(f, "vec{}<{scalar}>", self.components)
        }
    }
}

/// One `@location` binding of an entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceVar {
    pub location: u32,
    /// `None` for types that cannot cross a stage boundary.
    pub ty: Option<InterfaceType>,
}

/// A parsed and validated single-stage module.
#[derive(Debug, Clone)]
pub struct CompiledModule {
    pub stage: ShaderStage,
    /// Name of the entry point for `stage`.
    pub entry_point: String,
    /// User-defined inputs of the entry point, sorted by location.
    pub inputs: Vec<InterfaceVar>,
    /// User-defined outputs of the entry point, sorted by location.
    pub outputs: Vec<InterfaceVar>,
}

/// The interface of a successfully linked vertex/fragment pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedInterface {
    pub vertex_entry: String,
    pub fragment_entry: String,
    /// Inputs the vertex stage reads from vertex buffers.
    pub vertex_inputs: Vec<InterfaceVar>,
}

const fn naga_stage(stage: ShaderStage) -> naga::ShaderStage {
    match stage {
        ShaderStage::Vertex => naga::ShaderStage::Vertex,
        ShaderStage::Fragment => naga::ShaderStage::Fragment,
    }
}

/// Parses and validates `source` as a `stage` module.
///
/// On failure the returned string is the diagnostic log, rendered against
/// the source.
pub fn compile(stage: ShaderStage, source: &str) -> Result<CompiledModule, String> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| e.emit_to_string(source))?;

    let mut validator = Validator::new(ValidationFlags::all(), device_capabilities());
    validator
        .validate(&module)
        .map_err(|e| e.emit_to_string(source))?;

    let Some(entry) = module
        .entry_points
        .iter()
        .find(|ep| ep.stage == naga_stage(stage))
    else {
        return Err(format!("no @{stage} entry point found"));
    };

    let mut inputs = Vec::new();
    for arg in &entry.function.arguments {
        collect_locations(&module, arg.ty, arg.binding.as_ref(), &mut inputs);
    }

    let mut outputs = Vec::new();
    if let Some(result) = &entry.function.result {
        collect_locations(&module, result.ty, result.binding.as_ref(), &mut outputs);
    }

    inputs.sort_unstable_by_key(|var| var.location);
    outputs.sort_unstable_by_key(|var| var.location);

    Ok(CompiledModule {
        stage,
        entry_point: entry.name.clone(),
        inputs,
        outputs,
    })
}

/// Matches the vertex outputs against the fragment inputs.
pub fn link(vertex: &CompiledModule, fragment: &CompiledModule) -> Result<LinkedInterface, String> {
    if vertex.stage != ShaderStage::Vertex {
        return Err(format!("expected a vertex stage, got {}", vertex.stage));
    }
    if fragment.stage != ShaderStage::Fragment {
        return Err(format!("expected a fragment stage, got {}", fragment.stage));
    }

    let mut problems = Vec::new();
    for input in &fragment.inputs {
        match vertex.outputs.iter().find(|out| out.location == input.location) {
            None => problems.push(format!(
                "fragment input location {} is not written by the vertex stage",
                input.location
            )),
            Some(output) if output.ty != input.ty => problems.push(format!(
                "location {}: vertex stage writes {}, fragment stage reads {}",
                input.location,
                describe(output.ty),
                describe(input.ty)
            )),
            Some(_) => {}
        }
    }
    if !problems.is_empty() {
        return Err(problems.join("\n"));
    }

    Ok(LinkedInterface {
        vertex_entry: vertex.entry_point.clone(),
        fragment_entry: fragment.entry_point.clone(),
        vertex_inputs: vertex.inputs.clone(),
    })
}

fn describe(ty: Option<InterfaceType>) -> String {
    ty.map_or_else(|| "an unsupported type".to_string(), |ty| ty.to_string())
}

fn collect_locations(
    module: &Module,
    ty: Handle<Type>,
    binding: Option<&Binding>,
    out: &mut Vec<InterfaceVar>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => out.push(InterfaceVar {
            location: *location,
            ty: InterfaceType::from_inner(&module.types[ty].inner),
        }),
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_locations(module, member.ty, member.binding.as_ref(), out);
                }
            }
        }
    }
}
