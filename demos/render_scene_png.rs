//! Renders a few frames of a small scene and writes them as PNGs.
//!
//! ```bash
//! cargo run --example render_scene_png
//! ```

use scenette::{
    Animation, Brush, Element, Node, PixelSurface, Rect, RenderScope, Rgba8Premul, ScenetteResult,
    Surface,
};

/// A square sliding to the right over one second.
struct Slider {
    size: f64,
    color: Rgba8Premul,
}

impl Element for Slider {
    fn render(
        &mut self,
        surface: &mut dyn Surface,
        _scope: &mut RenderScope<'_>,
        time: f64,
        _dt: f64,
    ) -> ScenetteResult<()> {
        let x = (time.clamp(0.0, 1.0)) * (f64::from(surface.width()) - self.size);
        surface.fill_rect(
            Rect::new(x, 8.0, x + self.size, 8.0 + self.size),
            &Brush::solid(self.color),
        );
        Ok(())
    }

    fn max_tpos(&self) -> f64 {
        1.0
    }
}

fn main() -> ScenetteResult<()> {
    tracing_subscriber::fmt().init();

    let mut anim = Animation::new();
    anim.name = "slider-demo".to_string();
    anim.set_size(64, 32);
    anim.set_background("#1a1f33")?;
    anim.add(Node::group().child(Node::named(
        "slider",
        Slider {
            size: 12.0,
            color: Rgba8Premul::opaque(255, 160, 40),
        },
    )))?;

    let out = std::env::temp_dir();
    let mut surface = PixelSurface::new(64, 32);
    for frame in 0..5 {
        let time = f64::from(frame) / 4.0;
        anim.render(&mut surface, time, 0.25)?;
        let path = out.join(format!("scenette_frame_{frame}.png"));
        surface.write_png(&path)?;
        println!("wrote {}", path.display());
        surface.clear(Rgba8Premul::transparent());
    }

    anim.dispose();
    Ok(())
}
