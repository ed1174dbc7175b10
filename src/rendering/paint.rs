/// Paint commands produced from wrapped lines

use crate::{Color, RenderConfig};

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    /// Fill the whole canvas
    Clear { color: Color },
    /// Draw one line with the top of its line box at `y`
    Text {
        x: i32,
        y: i32,
        text: String,
        color: Color,
    },
}

/// Background fill followed by one left-aligned text command per line.
pub fn paint_lines(lines: &[String], config: &RenderConfig) -> Vec<PaintCommand> {
    let x = i32::try_from(config.margins.left).unwrap_or(i32::MAX);
    let mut y = i64::from(config.margins.top);
    let step = i64::from(config.line_height());

    let mut commands = Vec::with_capacity(lines.len() + 1);
    commands.push(PaintCommand::Clear {
        color: config.background,
    });
    for line in lines {
        let top = i32::try_from(y).unwrap_or(i32::MAX);
        y += step;
        if line.is_empty() {
            continue;
        }
        commands.push(PaintCommand::Text {
            x,
            y: top,
            text: line.clone(),
            color: config.foreground,
        });
    }
    commands
}
