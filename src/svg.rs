use crate::grid::{Cell, Position};
use crate::maze::Maze;
use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Path, Rectangle, Text};

const CELL_SIZE: f64 = 20.0;

fn center(p: Position) -> (f64, f64) {
    (
        (p.x as f64 + 0.5) * CELL_SIZE,
        (p.y as f64 + 0.5) * CELL_SIZE,
    )
}

/// Renders the maze with the agent's trail drawn on top.
pub fn render(maze: &Maze, trail: &[Position]) -> String {
    let width = maze.width() as f64 * CELL_SIZE;
    let height = maze.height() as f64 * CELL_SIZE;

    let mut document = Document::new()
        .set("width", width + 20.0)
        .set("height", height + 20.0)
        .set("viewBox", (-10.0, -10.0, width + 20.0, height + 20.0));

    // Draw cells
    for y in 0..maze.height() {
        for x in 0..maze.width() {
            let p = Position::new(x, y);
            let cell = maze.at(p);
            let color = match cell {
                Cell::Wall => "#404040",
                Cell::Floor | Cell::Unknown => "#ffffff",
                Cell::Start => "#80ff80",
                Cell::ControlRoom => "#ff8080",
            };
            let rect = Rectangle::new()
                .set("x", x as f64 * CELL_SIZE)
                .set("y", y as f64 * CELL_SIZE)
                .set("width", CELL_SIZE)
                .set("height", CELL_SIZE)
                .set("fill", color)
                .set("title", format!("{} {}", p, cell.to_char()));
            document = document.add(rect);

            if matches!(cell, Cell::Start | Cell::ControlRoom) {
                let (cx, cy) = center(p);
                let text = Text::new(cell.to_char().to_string())
                    .set("x", cx)
                    .set("y", cy + 5.0)
                    .set("text-anchor", "middle")
                    .set("font-size", "14px");
                document = document.add(text);
            }
        }
    }

    // Draw trail
    if let Some((&first, rest)) = trail.split_first() {
        let mut data = Data::new().move_to(center(first));
        for &p in rest {
            data = data.line_to(center(p));
        }
        let path = Path::new()
            .set("fill", "none")
            .set("stroke", "#3060ff")
            .set("stroke-width", 4)
            .set("stroke-linejoin", "round")
            .set("stroke-opacity", 0.6)
            .set("d", data);
        document = document.add(path);
    }

    document.to_string()
}

#[cfg(test)]
mod tests {
    use crate::grid::Position;
    use crate::maze::Maze;
    use crate::svg;

    #[test]
    fn test_svg_render_maze_with_trail() {
        let maze = Maze::parse(&["#####", "#T.C#", "#####"]).unwrap();
        let trail = [Position::new(1, 1), Position::new(2, 1), Position::new(3, 1)];
        let svg_str = svg::render(&maze, &trail);
        assert!(svg_str.contains("<svg"));
        assert_eq!(svg_str.matches("<rect").count(), 15);
        assert!(svg_str.contains("<path"));
    }

    #[test]
    fn test_svg_render_without_trail() {
        let maze = Maze::parse(&["TC"]).unwrap();
        let svg_str = svg::render(&maze, &[]);
        assert!(svg_str.contains("<svg"));
        assert!(!svg_str.contains("<path"));
    }
}
