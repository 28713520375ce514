//! Canvas 2D backend

use web_sys::CanvasRenderingContext2d;

use super::commands::DrawCommand;

/// Replay a frame onto the context, clearing it first
pub fn execute(ctx: &CanvasRenderingContext2d, width: f64, height: f64, commands: &[DrawCommand]) {
    ctx.clear_rect(0.0, 0.0, width, height);

    for command in commands {
        match command {
            DrawCommand::FillRect { rect, color } => {
                ctx.set_fill_style_str(&color.css());
                ctx.fill_rect(
                    f64::from(rect.x),
                    f64::from(rect.y),
                    f64::from(rect.width),
                    f64::from(rect.height),
                );
            }
            DrawCommand::Text {
                text,
                x,
                y,
                font,
                align,
                color,
            } => {
                ctx.set_font(font);
                ctx.set_text_align(align.css());
                ctx.set_fill_style_str(&color.css());
                // Only fails for invalid max-width arguments
                let _ = ctx.fill_text(text, f64::from(*x), f64::from(*y));
            }
        }
    }
}
