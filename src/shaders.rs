//! Shader stage compilation and the built-in composite shaders.
//!
//! The built-in sources target GLSL 1.40 (OpenGL 3.1) and consume the
//! full-screen quad's [`POSITION_TEX`](crate::VertexLayout::POSITION_TEX)
//! layout.

use crate::context::{GraphicsContext, ShaderStage};
use crate::error::{Error, Result};
use crate::program::{AttributeBindings, ProgramLinker, ShaderProgram};

/// Vertex shader for composite passes.
///
/// Passes the quad through untransformed (it is already in NDC) and forwards
/// the texture coordinate.
///
/// # Attributes
///
/// | Name         | Location | Type   |
/// |--------------|----------|--------|
/// | `a_position` | 0        | `vec3` |
/// | `a_texcoord` | 1        | `vec2` |
pub const COMPOSITE_VERTEX_SRC: &str = r"#version 140

in vec3 a_position;
in vec2 a_texcoord;

out vec2 v_texcoord;

void main() {
    v_texcoord = a_texcoord;
    gl_Position = vec4(a_position, 1.0);
}
";

/// Fragment shader that copies a color texture unchanged.
///
/// The sampler reads texture unit 0 unless the caller assigns another.
///
/// # Uniforms
///
/// | Name        | Type        | Description         |
/// |-------------|-------------|---------------------|
/// | `u_texture` | `sampler2D` | Source color buffer |
pub const COPY_FRAGMENT_SRC: &str = r"#version 140

in vec2 v_texcoord;

uniform sampler2D u_texture;

out vec4 frag_color;

void main() {
    frag_color = texture(u_texture, v_texcoord);
}
";

/// Attribute names of [`COMPOSITE_VERTEX_SRC`] and the quad layout locations
/// they must be pinned to.
pub const COMPOSITE_ATTRIBUTES: [(&str, u32); 2] = [("a_position", 0), ("a_texcoord", 1)];

/// A successfully compiled shader stage.
///
/// The handle stays valid until [`destroy`](Self::destroy); programs linked
/// from it keep working after that.
#[derive(Debug, Clone, Copy)]
pub struct CompiledShader<S> {
    handle: S,
    stage: ShaderStage,
}

impl<S: Copy> CompiledShader<S> {
    /// Compile `source` as a `stage` shader.
    ///
    /// A non-empty compiler log on success is logged as a warning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Compile`] with the compiler log if compilation fails,
    /// after freeing the shader object.
    pub fn compile<C>(ctx: &C, name: &str, stage: ShaderStage, source: &str) -> Result<Self>
    where
        C: GraphicsContext<Shader = S>,
    {
        let shader = ctx.create_shader(stage)?;
        ctx.shader_source(shader, source);
        ctx.compile_shader(shader);

        let log = ctx.shader_info_log(shader);
        if !ctx.shader_compile_status(shader) {
            ctx.delete_shader(shader);
            return Err(Error::Compile {
                name: name.to_owned(),
                stage: stage.name(),
                log,
            });
        }
        if !log.is_empty() {
            log::warn!("Shader compile log for {name} ({stage}): {}", log.trim_end());
        }

        Ok(Self {
            handle: shader,
            stage,
        })
    }

    /// Raw stage handle, for [`ProgramLinker::create`].
    #[must_use]
    pub fn handle(&self) -> S {
        self.handle
    }

    /// Pipeline stage this shader was compiled for.
    #[must_use]
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// Free the shader object.
    pub fn destroy<C>(self, ctx: &C)
    where
        C: GraphicsContext<Shader = S>,
    {
        ctx.delete_shader(self.handle);
    }
}

/// Build a composite-pass program from [`COMPOSITE_VERTEX_SRC`] and the given
/// fragment source.
///
/// `bindings` are extended with [`COMPOSITE_ATTRIBUTES`]. The stage objects
/// are freed before returning, whether or not linking succeeded.
///
/// # Errors
///
/// Propagates compile and link failures.
pub fn compile_composite_program<C: GraphicsContext>(
    ctx: &C,
    name: &str,
    fragment_src: &str,
    bindings: AttributeBindings,
) -> Result<ShaderProgram<C::Program>> {
    let vertex = CompiledShader::compile(ctx, name, ShaderStage::Vertex, COMPOSITE_VERTEX_SRC)?;
    let fragment = match CompiledShader::compile(ctx, name, ShaderStage::Fragment, fragment_src) {
        Ok(fragment) => fragment,
        Err(err) => {
            vertex.destroy(ctx);
            return Err(err);
        }
    };

    let bindings = COMPOSITE_ATTRIBUTES
        .iter()
        .fold(bindings, |bindings, &(attribute, location)| {
            bindings.with_binding(attribute, location)
        });
    let linked =
        ProgramLinker::new(bindings).create(ctx, name, &[vertex.handle(), fragment.handle()]);

    vertex.destroy(ctx);
    fragment.destroy(ctx);

    linked
}
