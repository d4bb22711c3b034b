//! Small WebGL2 renderer: one lit translucent mesh, additive point clouds and
//! flat textured quads.

use glam::{Mat4, Vec3};
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, HtmlImageElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram,
    WebGlShader, WebGlTexture, WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::color::Rgb;
use crate::error::{PortfolioError, PortfolioResult};

const MESH_VS: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
uniform mat4 u_view_proj;
out vec3 v_normal;
void main() {
    v_normal = a_normal;
    gl_Position = u_view_proj * vec4(a_position, 1.0);
}
"#;

const MESH_FS: &str = r#"#version 300 es
precision mediump float;
in vec3 v_normal;
uniform vec3 u_color;
uniform float u_opacity;
uniform vec3 u_light_dir;
uniform float u_ambient;
uniform float u_diffuse;
out vec4 frag;
void main() {
    // double sided
    float lambert = abs(dot(normalize(v_normal), u_light_dir));
    vec3 lit = u_color * (u_ambient + u_diffuse * lambert);
    frag = vec4(min(lit, vec3(1.0)), u_opacity);
}
"#;

const POINTS_VS: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 1) in float a_opacity;
layout(location = 2) in vec3 a_color;
uniform mat4 u_view;
uniform mat4 u_proj;
uniform float u_size;
uniform float u_scale;
out float v_opacity;
out vec3 v_color;
void main() {
    vec4 view_pos = u_view * vec4(a_position, 1.0);
    v_opacity = a_opacity;
    v_color = a_color;
    gl_PointSize = u_size * (u_scale / -view_pos.z);
    gl_Position = u_proj * view_pos;
}
"#;

const POINTS_FS: &str = r#"#version 300 es
precision mediump float;
in float v_opacity;
in vec3 v_color;
out vec4 frag;
void main() {
    frag = vec4(v_color, v_opacity);
}
"#;

const QUAD_VS: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec2 a_uv;
uniform mat4 u_view_proj;
uniform mat4 u_model;
out vec2 v_uv;
void main() {
    v_uv = a_uv;
    gl_Position = u_view_proj * u_model * vec4(a_position, 1.0);
}
"#;

const QUAD_FS: &str = r#"#version 300 es
precision mediump float;
in vec2 v_uv;
uniform sampler2D u_texture;
uniform float u_opacity;
uniform float u_light;
out vec4 frag;
void main() {
    vec4 texel = texture(u_texture, v_uv);
    frag = vec4(min(texel.rgb * u_light, vec3(1.0)), texel.a * u_opacity);
}
"#;

fn compile_shader(gl: &GL, kind: u32, source: &str) -> PortfolioResult<WebGlShader> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| PortfolioError::gl("unable to create shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(PortfolioError::gl(format!("shader compile: {log}")))
    }
}

fn link_program(gl: &GL, vs: &str, fs: &str) -> PortfolioResult<WebGlProgram> {
    let vs = compile_shader(gl, GL::VERTEX_SHADER, vs)?;
    let fs = compile_shader(gl, GL::FRAGMENT_SHADER, fs)?;
    let program = gl
        .create_program()
        .ok_or_else(|| PortfolioError::gl("unable to create program"))?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);
    gl.delete_shader(Some(&vs));
    gl.delete_shader(Some(&fs));
    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        Err(PortfolioError::gl(format!("program link: {log}")))
    }
}

struct Program {
    program: WebGlProgram,
}

impl Program {
    fn new(gl: &GL, vs: &str, fs: &str) -> PortfolioResult<Self> {
        Ok(Self {
            program: link_program(gl, vs, fs)?,
        })
    }

    fn uniform(&self, gl: &GL, name: &str) -> Option<WebGlUniformLocation> {
        gl.get_uniform_location(&self.program, name)
    }
}

fn create_buffer(gl: &GL) -> PortfolioResult<WebGlBuffer> {
    gl.create_buffer()
        .ok_or_else(|| PortfolioError::gl("unable to create buffer"))
}

fn create_vao(gl: &GL) -> PortfolioResult<WebGlVertexArrayObject> {
    gl.create_vertex_array()
        .ok_or_else(|| PortfolioError::gl("unable to create vertex array"))
}

/// Bind `buffer`, fill it and point attribute `location` at it.
fn attribute(gl: &GL, buffer: &WebGlBuffer, location: u32, size: i32, data: &[f32], usage: u32) {
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(buffer));
    let array = js_sys::Float32Array::from(data);
    gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &array, usage);
    gl.enable_vertex_attrib_array(location);
    gl.vertex_attrib_pointer_with_i32(location, size, GL::FLOAT, false, 0, 0);
}

fn update(gl: &GL, buffer: &WebGlBuffer, data: &[f32]) {
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(buffer));
    let array = js_sys::Float32Array::from(data);
    gl.buffer_sub_data_with_i32_and_array_buffer_view(GL::ARRAY_BUFFER, 0, &array);
}

/// Indexed triangle mesh whose positions and normals change every frame.
pub struct DynamicMesh {
    vao: WebGlVertexArrayObject,
    positions: WebGlBuffer,
    normals: WebGlBuffer,
    index_count: i32,
}

/// Point cloud with per-vertex opacity and color.
pub struct PointCloud {
    vao: WebGlVertexArrayObject,
    positions: WebGlBuffer,
    opacities: WebGlBuffer,
    colors: WebGlBuffer,
    count: i32,
    size: f32,
}

/// Unit quad lying flat, textured with one loaded image.
pub struct TexturedQuad {
    texture: WebGlTexture,
    model: Mat4,
}

/// Light rig shared by the lit programs.
pub struct Lighting {
    pub direction: Vec3,
    pub ambient: f32,
    pub diffuse: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            direction: Vec3::new(10.0, 10.0, 5.0).normalize(),
            ambient: 0.8,
            diffuse: 1.0,
        }
    }
}

pub struct Renderer {
    gl: GL,
    canvas: HtmlCanvasElement,
    mesh: Program,
    points: Program,
    quad: Program,
    quad_vao: WebGlVertexArrayObject,
    pub lighting: Lighting,
}

impl Renderer {
    pub fn new(canvas: HtmlCanvasElement) -> PortfolioResult<Self> {
        let gl: GL = canvas
            .get_context("webgl2")?
            .ok_or_else(|| PortfolioError::gl("WebGL2 not supported"))?
            .dyn_into()
            .map_err(|_| PortfolioError::gl("context is not WebGL2"))?;

        let mesh = Program::new(&gl, MESH_VS, MESH_FS)?;
        let points = Program::new(&gl, POINTS_VS, POINTS_FS)?;
        let quad = Program::new(&gl, QUAD_VS, QUAD_FS)?;

        // flat unit square in XZ, image top toward -Z
        let quad_vao = create_vao(&gl)?;
        gl.bind_vertex_array(Some(&quad_vao));
        #[rustfmt::skip]
        let corners: [f32; 12] = [
            -0.5, 0.0,  0.5,
             0.5, 0.0,  0.5,
            -0.5, 0.0, -0.5,
             0.5, 0.0, -0.5,
        ];
        let uvs: [f32; 8] = [0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0];
        attribute(&gl, &create_buffer(&gl)?, 0, 3, &corners, GL::STATIC_DRAW);
        attribute(&gl, &create_buffer(&gl)?, 1, 2, &uvs, GL::STATIC_DRAW);
        gl.bind_vertex_array(None);

        gl.enable(GL::DEPTH_TEST);
        gl.enable(GL::BLEND);

        Ok(Self {
            gl,
            canvas,
            mesh,
            points,
            quad,
            quad_vao,
            lighting: Lighting::default(),
        })
    }

    /// Match the drawing buffer to the CSS size of the canvas.
    pub fn resize(&self, css_width: f64, css_height: f64, pixel_ratio: f64) {
        let ratio = pixel_ratio.clamp(1.0, 2.0);
        let w = (css_width * ratio).round().max(1.0) as u32;
        let h = (css_height * ratio).round().max(1.0) as u32;
        self.canvas.set_width(w);
        self.canvas.set_height(h);
        self.gl.viewport(0, 0, w as i32, h as i32);
    }

    pub fn clear(&self, color: Rgb) {
        let gl = &self.gl;
        gl.depth_mask(true);
        gl.clear_color(color.r, color.g, color.b, 1.0);
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);
    }

    pub fn create_mesh(&self, positions: &[f32], normals: &[f32], indices: &[u32]) -> PortfolioResult<DynamicMesh> {
        let gl = &self.gl;
        let vao = create_vao(gl)?;
        gl.bind_vertex_array(Some(&vao));
        let pos_buf = create_buffer(gl)?;
        let nrm_buf = create_buffer(gl)?;
        attribute(gl, &pos_buf, 0, 3, positions, GL::DYNAMIC_DRAW);
        attribute(gl, &nrm_buf, 1, 3, normals, GL::DYNAMIC_DRAW);
        let idx_buf = create_buffer(gl)?;
        gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&idx_buf));
        let idx = js_sys::Uint32Array::from(indices);
        gl.buffer_data_with_array_buffer_view(GL::ELEMENT_ARRAY_BUFFER, &idx, GL::STATIC_DRAW);
        gl.bind_vertex_array(None);
        Ok(DynamicMesh {
            vao,
            positions: pos_buf,
            normals: nrm_buf,
            index_count: indices.len() as i32,
        })
    }

    pub fn update_mesh(&self, mesh: &DynamicMesh, positions: &[f32], normals: &[f32]) {
        update(&self.gl, &mesh.positions, positions);
        update(&self.gl, &mesh.normals, normals);
    }

    pub fn draw_mesh(&self, mesh: &DynamicMesh, view_proj: Mat4, color: Rgb, opacity: f32) {
        let gl = &self.gl;
        let p = &self.mesh;
        gl.use_program(Some(&p.program));
        gl.uniform_matrix4fv_with_f32_array(p.uniform(gl, "u_view_proj").as_ref(), false, &view_proj.to_cols_array());
        gl.uniform3f(p.uniform(gl, "u_color").as_ref(), color.r, color.g, color.b);
        gl.uniform1f(p.uniform(gl, "u_opacity").as_ref(), opacity);
        let l = self.lighting.direction;
        gl.uniform3f(p.uniform(gl, "u_light_dir").as_ref(), l.x, l.y, l.z);
        gl.uniform1f(p.uniform(gl, "u_ambient").as_ref(), self.lighting.ambient);
        gl.uniform1f(p.uniform(gl, "u_diffuse").as_ref(), self.lighting.diffuse);

        gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);
        gl.depth_mask(true);
        gl.disable(GL::CULL_FACE);
        gl.bind_vertex_array(Some(&mesh.vao));
        gl.draw_elements_with_i32(GL::TRIANGLES, mesh.index_count, GL::UNSIGNED_INT, 0);
        gl.bind_vertex_array(None);
    }

    pub fn create_points(&self, positions: &[f32], opacities: &[f32], colors: &[f32], size: f32) -> PortfolioResult<PointCloud> {
        let gl = &self.gl;
        let vao = create_vao(gl)?;
        gl.bind_vertex_array(Some(&vao));
        let pos_buf = create_buffer(gl)?;
        let op_buf = create_buffer(gl)?;
        let col_buf = create_buffer(gl)?;
        attribute(gl, &pos_buf, 0, 3, positions, GL::DYNAMIC_DRAW);
        attribute(gl, &op_buf, 1, 1, opacities, GL::DYNAMIC_DRAW);
        attribute(gl, &col_buf, 2, 3, colors, GL::DYNAMIC_DRAW);
        gl.bind_vertex_array(None);
        Ok(PointCloud {
            vao,
            positions: pos_buf,
            opacities: op_buf,
            colors: col_buf,
            count: opacities.len() as i32,
            size,
        })
    }

    pub fn update_points(&self, cloud: &PointCloud, positions: &[f32], opacities: &[f32], colors: &[f32]) {
        update(&self.gl, &cloud.positions, positions);
        update(&self.gl, &cloud.opacities, opacities);
        update(&self.gl, &cloud.colors, colors);
    }

    pub fn draw_points(&self, cloud: &PointCloud, view: Mat4, proj: Mat4) {
        let gl = &self.gl;
        let p = &self.points;
        gl.use_program(Some(&p.program));
        gl.uniform_matrix4fv_with_f32_array(p.uniform(gl, "u_view").as_ref(), false, &view.to_cols_array());
        gl.uniform_matrix4fv_with_f32_array(p.uniform(gl, "u_proj").as_ref(), false, &proj.to_cols_array());
        gl.uniform1f(p.uniform(gl, "u_size").as_ref(), cloud.size * self.canvas.height() as f32);
        gl.uniform1f(p.uniform(gl, "u_scale").as_ref(), 0.5);

        // additive, no depth writes
        gl.blend_func(GL::SRC_ALPHA, GL::ONE);
        gl.depth_mask(false);
        gl.bind_vertex_array(Some(&cloud.vao));
        gl.draw_arrays(GL::POINTS, 0, cloud.count);
        gl.bind_vertex_array(None);
        gl.depth_mask(true);
    }

    pub fn create_quad(&self, image: &HtmlImageElement, position: Vec3, width: f32, height: f32) -> PortfolioResult<TexturedQuad> {
        let gl = &self.gl;
        let texture = gl
            .create_texture()
            .ok_or_else(|| PortfolioError::gl("unable to create texture"))?;
        gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
        gl.tex_image_2d_with_u32_and_u32_and_html_image_element(
            GL::TEXTURE_2D,
            0,
            GL::RGBA as i32,
            GL::RGBA,
            GL::UNSIGNED_BYTE,
            image,
        )?;
        gl.generate_mipmap(GL::TEXTURE_2D);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR_MIPMAP_LINEAR as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);
        gl.bind_texture(GL::TEXTURE_2D, None);

        let model = Mat4::from_translation(position) * Mat4::from_scale(Vec3::new(width, 1.0, height));
        Ok(TexturedQuad { texture, model })
    }

    pub fn draw_quad(&self, quad: &TexturedQuad, view_proj: Mat4, opacity: f32) {
        let gl = &self.gl;
        let p = &self.quad;
        gl.use_program(Some(&p.program));
        gl.uniform_matrix4fv_with_f32_array(p.uniform(gl, "u_view_proj").as_ref(), false, &view_proj.to_cols_array());
        gl.uniform_matrix4fv_with_f32_array(p.uniform(gl, "u_model").as_ref(), false, &quad.model.to_cols_array());
        gl.uniform1f(p.uniform(gl, "u_opacity").as_ref(), opacity);
        // facing straight up, so only the vertical light component reaches it
        let light = self.lighting.ambient + self.lighting.diffuse * self.lighting.direction.y.max(0.0);
        gl.uniform1f(p.uniform(gl, "u_light").as_ref(), light);
        gl.active_texture(GL::TEXTURE0);
        gl.bind_texture(GL::TEXTURE_2D, Some(&quad.texture));
        gl.uniform1i(p.uniform(gl, "u_texture").as_ref(), 0);

        gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);
        gl.bind_vertex_array(Some(&self.quad_vao));
        gl.draw_arrays(GL::TRIANGLE_STRIP, 0, 4);
        gl.bind_vertex_array(None);
    }
}
