//! # agge
//!
//! Software anti-aliased 2D vector rasterization. Paths go in, exact
//! per-pixel coverage comes out, and a pluggable blender composites that
//! coverage onto a caller-owned pixel buffer, optionally on many threads.
//!
//! ## Pipeline
//!
//! 1. **Vertex source**: [`PathStorage`](path_storage::PathStorage),
//!    [`Ellipse`](ellipse::Ellipse) or any [`VertexSource`](basics::VertexSource)
//! 2. **Conversion**: [`ConvTransform`](conv_transform::ConvTransform),
//!    [`ConvCurve`](conv_curve::ConvCurve), [`ConvStroke`](conv_stroke::ConvStroke)
//! 3. **Rasterizer**: [`RasterizerScanlineAa`](rasterizer_scanline_aa::RasterizerScanlineAa)
//!    turns edges into cells of 24.8 fixed-point coverage
//! 4. **Mask**: the prepared rasterizer's [`CellMask`](mask::CellMask), swept
//!    row by row through an [`AlphaFn`](alpha::AlphaFn)
//! 5. **Renderer**: [`Renderer`](renderer::Renderer) or
//!    [`ParallelRenderer`](renderer_parallel::ParallelRenderer) feeding a
//!    [`Blender`](renderer::Blender)
//!
//! ```
//! use agge::alpha::NonZeroAlpha;
//! use agge::blenders::{Rgba8, SolidBlender};
//! use agge::conv_stroke::ConvStroke;
//! use agge::math_stroke::LineJoin;
//! use agge::path_storage::PathStorage;
//! use agge::rasterizer_scanline_aa::RasterizerScanlineAa;
//! use agge::renderer::Renderer;
//! use agge::rendering_buffer::RenderingBuffer;
//!
//! # fn main() -> agge::error::Result<()> {
//! let mut path = PathStorage::new();
//! path.move_to(10.0, 10.0);
//! path.line_to(50.0, 20.0);
//! path.line_to(20.0, 40.0);
//!
//! let mut stroke = ConvStroke::new(path);
//! stroke.set_width(6.0);
//! stroke.set_line_join(LineJoin::Round);
//!
//! let mut ras = RasterizerScanlineAa::new();
//! ras.add_path(&mut stroke, 0)?;
//! ras.prepare();
//!
//! let mut pixels = vec![Rgba8::opaque(255, 255, 255); 64 * 64];
//! let mut buffer = RenderingBuffer::packed(&mut pixels, 64, 64)?;
//! let blender = SolidBlender::new(Rgba8::opaque(0, 0, 0));
//! Renderer::new().render(&mut buffer, None, &ras.mask()?, &blender, &NonZeroAlpha)?;
//! assert_eq!(pixels[15 * 64 + 30], Rgba8::opaque(0, 0, 0));
//! # Ok(())
//! # }
//! ```

// Foundation
pub mod basics;
pub mod error;
pub mod math;

// Geometry sources and converters
pub mod conv_curve;
pub mod conv_transform;
pub mod curves;
pub mod ellipse;
pub mod path_storage;
pub mod trans_affine;

// Stroke generation
pub mod conv_adaptor_vcgen;
pub mod conv_stroke;
pub mod math_stroke;
pub mod vcgen_stroke;
pub mod vertex_sequence;

// Rasterization
pub mod alpha;
pub mod mask;
pub mod rasterizer_cells_aa;
pub mod rasterizer_scanline_aa;
pub mod scanline_u;

// Composition
pub mod blenders;
pub mod renderer;
pub mod renderer_parallel;
pub mod rendering_buffer;
