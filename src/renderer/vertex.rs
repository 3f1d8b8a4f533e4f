//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Textured, tinted vertex in screen pixels
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl SpriteVertex {
    pub const fn new(position: Vec2, uv: Vec2, color: [f32; 4]) -> Self {
        Self {
            position: [position.x, position.y],
            uv: [uv.x, uv.y],
            color,
        }
    }

    /// Vertex for untextured geometry (samples the middle of the white texture)
    pub const fn solid(position: Vec2, color: [f32; 4]) -> Self {
        Self::new(position, Vec2::new(0.5, 0.5), color)
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::from(self.position)
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(SpriteVertex, position) as wgpu::BufferAddress,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(SpriteVertex, uv) as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(SpriteVertex, color) as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    /// Sprites without art, the heading line
    pub const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const PATH_DOT: [f32; 4] = [1.0, 1.0, 1.0, 0.9];
    pub const PARTICLE: [f32; 4] = [1.0, 0.75, 0.25, 1.0];
    pub const PANEL_BG: [f32; 4] = [0.1, 0.1, 0.12, 0.85];
    pub const PANEL_FILL: [f32; 4] = [0.25, 0.45, 0.8, 0.9];
    pub const PANEL_ACTIVE: [f32; 4] = [0.35, 0.6, 1.0, 0.95];
    pub const PANEL_TEXT: [f32; 4] = [0.95, 0.95, 0.95, 1.0];
    pub const CLEAR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
}
