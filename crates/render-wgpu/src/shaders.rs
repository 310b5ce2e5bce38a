use std::path::{Path, PathBuf};

/// Vertex stage entry point every shader must define.
pub const VERTEX_ENTRY: &str = "vs_main";
/// Fragment stage entry point every shader must define.
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Errors from loading a user-supplied shader.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read shader {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("shader `{label}` has no `{entry}` entry point")]
    MissingEntryPoint { label: String, entry: &'static str },
}

/// WGSL source plus a label for wgpu debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    label: String,
    wgsl: String,
}

impl ShaderSource {
    /// The built-in ray-marching scene.
    pub fn builtin() -> Self {
        Self {
            label: "raymarch_shader".into(),
            wgsl: RAYMARCH_SHADER.into(),
        }
    }

    /// Wrap WGSL text, checking that both entry points are present.
    pub fn from_wgsl(
        label: impl Into<String>,
        wgsl: impl Into<String>,
    ) -> Result<Self, ShaderError> {
        let label = label.into();
        let wgsl = wgsl.into();
        for entry in [VERTEX_ENTRY, FRAGMENT_ENTRY] {
            if !wgsl.contains(&format!("fn {entry}(")) {
                return Err(ShaderError::MissingEntryPoint { label, entry });
            }
        }
        Ok(Self { label, wgsl })
    }

    /// Read a WGSL file. The uniform block must match [`RAYMARCH_SHADER`]'s.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        let wgsl = std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = wgsl.len(), "loaded shader");
        Self::from_wgsl(path.display().to_string(), wgsl)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn wgsl(&self) -> &str {
        &self.wgsl
    }
}

impl Default for ShaderSource {
    fn default() -> Self {
        Self::builtin()
    }
}

/// WGSL shader: full-screen quad vertex stage plus a sphere-traced scene.
pub const RAYMARCH_SHADER: &str = r#"
struct Uniforms {
    view: mat4x4<f32>,
    position: vec3<f32>,
    zoom: f32,
    forward: vec3<f32>,
    up: vec3<f32>,
    resolution: vec2<f32>,
    angles: vec2<f32>,
};

@group(0) @binding(0)
var<uniform> u: Uniforms;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) ndc: vec2<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = vec4<f32>(position, 1.0);
    out.ndc = position.xy;
    return out;
}

fn sd_sphere(p: vec3<f32>, r: f32) -> f32 {
    return length(p) - r;
}

fn sd_box(p: vec3<f32>, b: vec3<f32>) -> f32 {
    let q = abs(p) - b;
    return length(max(q, vec3<f32>(0.0))) + min(max(q.x, max(q.y, q.z)), 0.0);
}

fn scene(p: vec3<f32>) -> f32 {
    let ground = p.y + 1.5;
    let sphere = sd_sphere(p - vec3<f32>(0.0, 0.0, -5.0), 1.0);
    let cube = sd_box(p - vec3<f32>(3.0, -0.5, -7.0), vec3<f32>(1.0));
    return min(ground, min(sphere, cube));
}

fn normal_at(p: vec3<f32>) -> vec3<f32> {
    let e = vec2<f32>(0.001, 0.0);
    return normalize(vec3<f32>(
        scene(p + e.xyy) - scene(p - e.xyy),
        scene(p + e.yxy) - scene(p - e.yxy),
        scene(p + e.yyx) - scene(p - e.yyx),
    ));
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let aspect = u.resolution.x / u.resolution.y;
    let half_fov = tan(radians(u.zoom) * 0.5);
    let right = normalize(cross(u.forward, vec3<f32>(0.0, 1.0, 0.0)));
    let dir = normalize(
        u.forward + in.ndc.x * aspect * half_fov * right + in.ndc.y * half_fov * u.up
    );

    let sky = mix(vec3<f32>(0.55, 0.7, 0.9), vec3<f32>(0.1, 0.2, 0.45), clamp(dir.y, 0.0, 1.0));

    var t = 0.0;
    for (var i = 0; i < 128; i = i + 1) {
        let d = scene(u.position + dir * t);
        if (d < 0.001) {
            let p = u.position + dir * t;
            let n = normal_at(p);
            let light = normalize(vec3<f32>(0.4, 1.0, 0.3));
            let diffuse = max(dot(n, light), 0.0);
            let checker = select(0.8, 0.6, (i32(floor(p.x)) + i32(floor(p.z))) % 2 == 0);
            let albedo = select(vec3<f32>(0.9, 0.45, 0.3), vec3<f32>(checker), p.y < -1.49);
            let color = albedo * (0.2 + 0.8 * diffuse);
            let fog = 1.0 - exp(-0.02 * t);
            return vec4<f32>(mix(color, sky, fog), 1.0);
        }
        t = t + d;
        if (t > 100.0) {
            break;
        }
    }
    return vec4<f32>(sky, 1.0);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_both_entry_points() {
        let src = ShaderSource::builtin();
        assert!(ShaderSource::from_wgsl("copy", src.wgsl()).is_ok());
        assert_eq!(src.label(), "raymarch_shader");
        assert_eq!(ShaderSource::default(), src);
    }

    #[test]
    fn rejects_missing_fragment_entry() {
        let err = ShaderSource::from_wgsl("half", "@vertex fn vs_main() {}").unwrap_err();
        match err {
            ShaderError::MissingEntryPoint { label, entry } => {
                assert_eq!(label, "half");
                assert_eq!(entry, FRAGMENT_ENTRY);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_missing_file_reports_path() {
        let path = std::env::temp_dir().join("marchview-does-not-exist.wgsl");
        let err = ShaderSource::load(&path).unwrap_err();
        assert!(matches!(err, ShaderError::Io { .. }));
        assert!(err.to_string().contains("marchview-does-not-exist.wgsl"));
    }

    #[test]
    fn load_reads_file() {
        let path =
            std::env::temp_dir().join(format!("marchview-shader-{}.wgsl", std::process::id()));
        std::fs::write(&path, RAYMARCH_SHADER).unwrap();
        let src = ShaderSource::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(src.wgsl(), RAYMARCH_SHADER);
        assert!(src.label().ends_with(".wgsl"));
    }
}
