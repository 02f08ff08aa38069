//! SVG path data.
//!
//! Path data goes through a chain of lazy stages, each pulling one item at a
//! time from the stage before it:
//!
//! ```text
//! "M0 0 h10 v10 z"
//!    └── Tokens             letters and numbers, separators dropped
//!          └── CommandGroups       letter + all following numbers
//!                └── SplitPolycommands   one argument set per command
//!                      └── Absolutize          canonical absolute Commands
//! ```
//!
//! The resulting commands are regrouped into subpaths at every moveto, and
//! each subpath can be linearized into a basic [`Shape`].

use std::fmt;

use smallvec::SmallVec;
use tracing::trace;

use crate::error::{parse_number, SceneError, SceneResult};
use crate::geometry::{BoundingBox, Line, Point, Polygon, Polyline, Shape};
use crate::transform::Transform;

/// Default tolerance for treating a closing vertex as a duplicate of the first.
pub const DEFAULT_EPSILON: f64 = 1e-9;

// ==================== Commands ====================

/// A canonical path command. All coordinates are absolute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    MoveTo { x: f64, y: f64 },
    ClosePath,
    LineTo { x: f64, y: f64 },
    CurveTo { x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64 },
    SmoothCurveTo { x2: f64, y2: f64, x: f64, y: f64 },
    QuadraticCurveTo { x1: f64, y1: f64, x: f64, y: f64 },
    SmoothQuadraticCurveTo { x: f64, y: f64 },
    EllipticalArc {
        rx: f64,
        ry: f64,
        rotation: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    },
}

impl Command {
    /// The SVG letter of the absolute form of this command.
    pub fn letter(&self) -> char {
        match self {
            Command::MoveTo { .. } => 'M',
            Command::ClosePath => 'Z',
            Command::LineTo { .. } => 'L',
            Command::CurveTo { .. } => 'C',
            Command::SmoothCurveTo { .. } => 'S',
            Command::QuadraticCurveTo { .. } => 'Q',
            Command::SmoothQuadraticCurveTo { .. } => 'T',
            Command::EllipticalArc { .. } => 'A',
        }
    }

    /// The endpoint of the command; `None` for closepath.
    pub fn endpoint(&self) -> Option<Point> {
        match *self {
            Command::ClosePath => None,
            Command::MoveTo { x, y }
            | Command::LineTo { x, y }
            | Command::CurveTo { x, y, .. }
            | Command::SmoothCurveTo { x, y, .. }
            | Command::QuadraticCurveTo { x, y, .. }
            | Command::SmoothQuadraticCurveTo { x, y }
            | Command::EllipticalArc { x, y, .. } => Some(Point::new(x, y)),
        }
    }

    /// Control points in argument order, endpoint last.
    ///
    /// Arcs only report their endpoint.
    pub fn control_points(&self) -> SmallVec<[Point; 3]> {
        match *self {
            Command::ClosePath => SmallVec::new(),
            Command::CurveTo { x1, y1, x2, y2, x, y } => SmallVec::from_buf([
                Point::new(x1, y1),
                Point::new(x2, y2),
                Point::new(x, y),
            ]),
            Command::SmoothCurveTo { x2: x1, y2: y1, x, y }
            | Command::QuadraticCurveTo { x1, y1, x, y } => {
                let mut points = SmallVec::new();
                points.push(Point::new(x1, y1));
                points.push(Point::new(x, y));
                points
            }
            Command::MoveTo { x, y }
            | Command::LineTo { x, y }
            | Command::SmoothQuadraticCurveTo { x, y }
            | Command::EllipticalArc { x, y, .. } => {
                let mut points = SmallVec::new();
                points.push(Point::new(x, y));
                points
            }
        }
    }

    /// Get a transformed copy of the command.
    ///
    /// Arc radii, rotation and flags are carried over unchanged; only the
    /// endpoint moves.
    pub fn transform(&self, t: &Transform) -> Command {
        let p = |x: f64, y: f64| t.apply_point(x, y);
        match *self {
            Command::MoveTo { x, y } => {
                let (x, y) = p(x, y);
                Command::MoveTo { x, y }
            }
            Command::ClosePath => Command::ClosePath,
            Command::LineTo { x, y } => {
                let (x, y) = p(x, y);
                Command::LineTo { x, y }
            }
            Command::CurveTo { x1, y1, x2, y2, x, y } => {
                let (x1, y1) = p(x1, y1);
                let (x2, y2) = p(x2, y2);
                let (x, y) = p(x, y);
                Command::CurveTo { x1, y1, x2, y2, x, y }
            }
            Command::SmoothCurveTo { x2, y2, x, y } => {
                let (x2, y2) = p(x2, y2);
                let (x, y) = p(x, y);
                Command::SmoothCurveTo { x2, y2, x, y }
            }
            Command::QuadraticCurveTo { x1, y1, x, y } => {
                let (x1, y1) = p(x1, y1);
                let (x, y) = p(x, y);
                Command::QuadraticCurveTo { x1, y1, x, y }
            }
            Command::SmoothQuadraticCurveTo { x, y } => {
                let (x, y) = p(x, y);
                Command::SmoothQuadraticCurveTo { x, y }
            }
            Command::EllipticalArc { rx, ry, rotation, large_arc, sweep, x, y } => {
                let (x, y) = p(x, y);
                Command::EllipticalArc { rx, ry, rotation, large_arc, sweep, x, y }
            }
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = |b: bool| if b { 1 } else { 0 };
        match *self {
            Command::ClosePath => write!(f, "Z"),
            Command::MoveTo { x, y }
            | Command::LineTo { x, y }
            | Command::SmoothQuadraticCurveTo { x, y } => {
                write!(f, "{} {} {}", self.letter(), x, y)
            }
            Command::CurveTo { x1, y1, x2, y2, x, y } => {
                write!(f, "C {} {} {} {} {} {}", x1, y1, x2, y2, x, y)
            }
            Command::SmoothCurveTo { x2: x1, y2: y1, x, y }
            | Command::QuadraticCurveTo { x1, y1, x, y } => {
                write!(f, "{} {} {} {} {}", self.letter(), x1, y1, x, y)
            }
            Command::EllipticalArc { rx, ry, rotation, large_arc, sweep, x, y } => write!(
                f,
                "A {} {} {} {} {} {} {}",
                rx,
                ry,
                rotation,
                flag(large_arc),
                flag(sweep),
                x,
                y
            ),
        }
    }
}

// ==================== Stage 1: tokens ====================

/// A path data token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Command(char),
    Number(f64),
}

fn is_command_letter(b: u8) -> bool {
    matches!(
        b,
        b'M' | b'm' | b'Z' | b'z' | b'L' | b'l' | b'H' | b'h' | b'V' | b'v'
            | b'C' | b'c' | b'S' | b's' | b'Q' | b'q' | b'T' | b't' | b'A' | b'a'
    )
}

fn is_number_byte(b: u8) -> bool {
    matches!(b, b'-' | b'+' | b'0'..=b'9' | b'.' | b'E' | b'e')
}

fn is_separator(b: u8) -> bool {
    matches!(b, b',' | b' ' | b'\t' | b'\r' | b'\n')
}

/// Scanner over path data.
///
/// A number token is the longest run of `[-+0-9.Ee]`, so `10-5` is a single
/// (invalid) literal rather than two numbers.
pub struct Tokens<'a> {
    data: &'a str,
    pos: usize,
}

impl<'a> Tokens<'a> {
    pub fn new(data: &'a str) -> Self {
        Self { data, pos: 0 }
    }

    fn fail(&mut self, err: SceneError) -> Option<SceneResult<Token>> {
        self.pos = self.data.len();
        Some(Err(err))
    }
}

impl Iterator for Tokens<'_> {
    type Item = SceneResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        let data = self.data;
        let bytes = data.as_bytes();
        while self.pos < bytes.len() && is_separator(bytes[self.pos]) {
            self.pos += 1;
        }
        let start = self.pos;
        let &b = bytes.get(start)?;

        if is_command_letter(b) {
            self.pos += 1;
            return Some(Ok(Token::Command(b as char)));
        }
        if is_number_byte(b) {
            while self.pos < bytes.len() && is_number_byte(bytes[self.pos]) {
                self.pos += 1;
            }
            return match parse_number(&data[start..self.pos]) {
                Ok(n) => Some(Ok(Token::Number(n))),
                Err(err) => self.fail(err),
            };
        }
        let remainder = &data[start..];
        self.fail(SceneError::parse(format!("could not tokenize path: {remainder}")))
    }
}

// ==================== Stage 2: command groups ====================

/// A command letter with its raw arguments, relative or absolute.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCommand {
    pub letter: char,
    pub args: SmallVec<[f64; 7]>,
}

impl RawCommand {
    pub fn new(letter: char, args: &[f64]) -> Self {
        Self {
            letter,
            args: SmallVec::from_slice(args),
        }
    }

    fn push_arg(&mut self, value: f64) {
        let value = if matches!(self.letter, 'A' | 'a') {
            match self.args.len() % 7 {
                // radii
                0 | 1 => value.abs(),
                // large-arc and sweep flags
                3 | 4 => {
                    if value != 0.0 {
                        1.0
                    } else {
                        0.0
                    }
                }
                _ => value,
            }
        } else {
            value
        };
        self.args.push(value);
    }
}

/// Number of arguments one instance of a command takes.
pub fn arity(letter: char) -> Option<usize> {
    match letter.to_ascii_uppercase() {
        'Z' => Some(0),
        'H' | 'V' => Some(1),
        'M' | 'L' | 'T' => Some(2),
        'S' | 'Q' => Some(4),
        'C' => Some(6),
        'A' => Some(7),
        _ => None,
    }
}

/// Groups each command letter with the numbers that follow it.
pub struct CommandGroups<I> {
    tokens: I,
    current: Option<RawCommand>,
    done: bool,
}

impl<I> CommandGroups<I>
where
    I: Iterator<Item = SceneResult<Token>>,
{
    pub fn new(tokens: I) -> Self {
        Self {
            tokens,
            current: None,
            done: false,
        }
    }
}

impl<I> Iterator for CommandGroups<I>
where
    I: Iterator<Item = SceneResult<Token>>,
{
    type Item = SceneResult<RawCommand>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.tokens.next() {
                Some(Ok(Token::Command(letter))) => {
                    let next = RawCommand::new(letter, &[]);
                    if let Some(finished) = self.current.replace(next) {
                        return Some(Ok(finished));
                    }
                }
                Some(Ok(Token::Number(value))) => match self.current.as_mut() {
                    Some(command) => command.push_arg(value),
                    None => {
                        self.done = true;
                        return Some(Err(SceneError::parse("argument before first command")));
                    }
                },
                Some(Err(err)) => {
                    self.done = true;
                    return Some(Err(err));
                }
                None => {
                    self.done = true;
                    return self.current.take().map(Ok);
                }
            }
        }
    }
}

// ==================== Stage 3: polycommands ====================

/// Splits a command carrying several argument sets into one command per set.
///
/// Extra coordinate pairs after a moveto become linetos of the same case.
pub struct SplitPolycommands<I> {
    groups: I,
    pending: Option<(RawCommand, usize)>,
    done: bool,
}

impl<I> SplitPolycommands<I>
where
    I: Iterator<Item = SceneResult<RawCommand>>,
{
    pub fn new(groups: I) -> Self {
        Self {
            groups,
            pending: None,
            done: false,
        }
    }

    fn next_chunk(&mut self) -> Option<RawCommand> {
        let (group, offset) = self.pending.as_mut()?;
        let n = arity(group.letter).unwrap_or(0);
        let letter = match (group.letter, *offset) {
            ('M', o) if o > 0 => 'L',
            ('m', o) if o > 0 => 'l',
            (letter, _) => letter,
        };
        let chunk = RawCommand::new(letter, &group.args[*offset..*offset + n]);
        *offset += n;
        if *offset >= group.args.len() {
            self.pending = None;
        }
        Some(chunk)
    }
}

impl<I> Iterator for SplitPolycommands<I>
where
    I: Iterator<Item = SceneResult<RawCommand>>,
{
    type Item = SceneResult<RawCommand>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(chunk) = self.next_chunk() {
            return Some(Ok(chunk));
        }
        if self.done {
            return None;
        }
        let group = match self.groups.next()? {
            Ok(group) => group,
            Err(err) => {
                self.done = true;
                return Some(Err(err));
            }
        };
        let Some(n) = arity(group.letter) else {
            self.done = true;
            return Some(Err(SceneError::parse(format!(
                "unknown path command: {}",
                group.letter
            ))));
        };
        let count = group.args.len();
        let valid = if n == 0 {
            count == 0
        } else {
            count > 0 && count % n == 0
        };
        if !valid {
            self.done = true;
            return Some(Err(SceneError::parse(format!(
                "wrong argument count for {}: {}",
                group.letter, count
            ))));
        }
        if count <= n {
            return Some(Ok(group));
        }
        self.pending = Some((group, 0));
        self.next_chunk().map(Ok)
    }
}

// ==================== Stage 4: absolute commands ====================

/// Rewrites relative and shorthand commands into canonical absolute ones.
pub struct Absolutize<I> {
    commands: I,
    /// Current point.
    cx: f64,
    cy: f64,
    /// Start of the current subpath.
    mx: f64,
    my: f64,
    started: bool,
    done: bool,
}

impl<I> Absolutize<I>
where
    I: Iterator<Item = SceneResult<RawCommand>>,
{
    pub fn new(commands: I) -> Self {
        Self {
            commands,
            cx: 0.0,
            cy: 0.0,
            mx: 0.0,
            my: 0.0,
            started: false,
            done: false,
        }
    }

    fn absolutize(&mut self, raw: &RawCommand) -> SceneResult<Command> {
        let (cx, cy) = (self.cx, self.cy);
        let a = raw.args.as_slice();
        let command = match (raw.letter, a) {
            ('M', &[x, y]) => Command::MoveTo { x, y },
            ('m', &[x, y]) => Command::MoveTo { x: x + cx, y: y + cy },
            ('Z' | 'z', &[]) => Command::ClosePath,
            ('L', &[x, y]) => Command::LineTo { x, y },
            ('l', &[x, y]) => Command::LineTo { x: x + cx, y: y + cy },
            ('H', &[x]) => Command::LineTo { x, y: cy },
            ('h', &[x]) => Command::LineTo { x: x + cx, y: cy },
            ('V', &[y]) => Command::LineTo { x: cx, y },
            ('v', &[y]) => Command::LineTo { x: cx, y: y + cy },
            ('C', &[x1, y1, x2, y2, x, y]) => Command::CurveTo { x1, y1, x2, y2, x, y },
            ('c', &[x1, y1, x2, y2, x, y]) => Command::CurveTo {
                x1: x1 + cx,
                y1: y1 + cy,
                x2: x2 + cx,
                y2: y2 + cy,
                x: x + cx,
                y: y + cy,
            },
            ('S', &[x2, y2, x, y]) => Command::SmoothCurveTo { x2, y2, x, y },
            ('s', &[x2, y2, x, y]) => Command::SmoothCurveTo {
                x2: x2 + cx,
                y2: y2 + cy,
                x: x + cx,
                y: y + cy,
            },
            ('Q', &[x1, y1, x, y]) => Command::QuadraticCurveTo { x1, y1, x, y },
            ('q', &[x1, y1, x, y]) => Command::QuadraticCurveTo {
                x1: x1 + cx,
                y1: y1 + cy,
                x: x + cx,
                y: y + cy,
            },
            ('T', &[x, y]) => Command::SmoothQuadraticCurveTo { x, y },
            ('t', &[x, y]) => Command::SmoothQuadraticCurveTo { x: x + cx, y: y + cy },
            ('A', &[rx, ry, rotation, large, sweep, x, y]) => Command::EllipticalArc {
                rx,
                ry,
                rotation,
                large_arc: large != 0.0,
                sweep: sweep != 0.0,
                x,
                y,
            },
            ('a', &[rx, ry, rotation, large, sweep, x, y]) => Command::EllipticalArc {
                rx,
                ry,
                rotation,
                large_arc: large != 0.0,
                sweep: sweep != 0.0,
                x: x + cx,
                y: y + cy,
            },
            (letter, args) => {
                return Err(SceneError::parse(format!(
                    "wrong argument count for {}: {}",
                    letter,
                    args.len()
                )));
            }
        };

        match command {
            Command::MoveTo { x, y } => {
                self.mx = x;
                self.my = y;
                self.cx = x;
                self.cy = y;
            }
            Command::ClosePath => {
                self.cx = self.mx;
                self.cy = self.my;
            }
            other => {
                if let Some(end) = other.endpoint() {
                    self.cx = end.x;
                    self.cy = end.y;
                }
            }
        }
        Ok(command)
    }
}

impl<I> Iterator for Absolutize<I>
where
    I: Iterator<Item = SceneResult<RawCommand>>,
{
    type Item = SceneResult<Command>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.commands.next()?.and_then(|raw| {
            if !self.started && !matches!(raw.letter, 'M' | 'm') {
                return Err(SceneError::parse(format!(
                    "path must begin with a moveto, found {}",
                    raw.letter
                )));
            }
            self.started = true;
            self.absolutize(&raw)
        });
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}

/// Lazily parse path data into canonical absolute commands.
pub fn parse_commands(data: &str) -> impl Iterator<Item = SceneResult<Command>> + '_ {
    Absolutize::new(SplitPolycommands::new(CommandGroups::new(Tokens::new(data))))
}

// ==================== Subpaths and paths ====================

/// A run of commands starting at a moveto.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Subpath {
    pub commands: Vec<Command>,
}

impl Subpath {
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    /// A subpath is closed iff its last command is a closepath.
    pub fn is_closed(&self) -> bool {
        matches!(self.commands.last(), Some(Command::ClosePath))
    }

    pub fn transform(&self, transform: &Transform) -> Self {
        Self {
            commands: self.commands.iter().map(|c| c.transform(transform)).collect(),
        }
    }

    /// Convert the subpath to a basic shape.
    ///
    /// Only command endpoints are sampled; curve control points are ignored.
    /// Closed subpaths become repaired polygons, two points become a line,
    /// anything else (a lone moveto included) a polyline.
    pub fn linearize(&self, epsilon: f64) -> Shape {
        let points: Vec<Point> = self.commands.iter().filter_map(Command::endpoint).collect();
        if self.is_closed() {
            let mut polygon = Polygon::new(points);
            polygon.repair(epsilon);
            return Shape::Polygon(polygon);
        }
        match points.len() {
            2 => Shape::Line(Line {
                p1: points[0],
                p2: points[1],
            }),
            _ => Shape::Polyline(Polyline::new(points)),
        }
    }
}

/// A parsed path: an ordered list of subpaths.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    pub subpaths: Vec<Subpath>,
}

impl Path {
    pub fn new(subpaths: Vec<Subpath>) -> Self {
        Self { subpaths }
    }

    /// Parse SVG path data (the `d` attribute).
    pub fn parse(data: &str) -> SceneResult<Self> {
        let mut subpaths: Vec<Subpath> = Vec::new();
        for command in parse_commands(data) {
            let command = command?;
            let starts_subpath = matches!(command, Command::MoveTo { .. });
            match subpaths.last_mut() {
                Some(subpath) if !starts_subpath => subpath.commands.push(command),
                _ => subpaths.push(Subpath::new(vec![command])),
            }
        }
        trace!(subpaths = subpaths.len(), "parsed path data");
        Ok(Self { subpaths })
    }

    pub fn subpaths(&self) -> &[Subpath] {
        &self.subpaths
    }

    /// All commands of all subpaths, in order.
    pub fn commands(&self) -> impl Iterator<Item = &Command> + '_ {
        self.subpaths.iter().flat_map(|s| s.commands.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    pub fn transform(&self, transform: &Transform) -> Self {
        Self {
            subpaths: self.subpaths.iter().map(|s| s.transform(transform)).collect(),
        }
    }

    /// Bounding box of every control point, curve handles included.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bounding_box = BoundingBox::empty();
        for point in self.commands().flat_map(|c| c.control_points()) {
            bounding_box.add_point(point.x, point.y);
        }
        bounding_box
    }

    /// Convert the path to basic shapes, one per subpath.
    pub fn linearize(&self) -> Vec<Shape> {
        self.linearize_with_epsilon(DEFAULT_EPSILON)
    }

    pub fn linearize_with_epsilon(&self, epsilon: f64) -> Vec<Shape> {
        self.subpaths.iter().map(|s| s.linearize(epsilon)).collect()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, command) in self.commands().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{command}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commands(data: &str) -> Vec<Command> {
        parse_commands(data).collect::<SceneResult<Vec<_>>>().unwrap()
    }

    fn raw_groups(data: &str) -> Vec<RawCommand> {
        SplitPolycommands::new(CommandGroups::new(Tokens::new(data)))
            .collect::<SceneResult<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_tokenize() {
        let tokens: Vec<Token> = Tokens::new("M10,-20.5\tl 1e2 .5z")
            .collect::<SceneResult<_>>()
            .unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Command('M'),
                Token::Number(10.0),
                Token::Number(-20.5),
                Token::Command('l'),
                Token::Number(100.0),
                Token::Number(0.5),
                Token::Command('z'),
            ]
        );
    }

    #[test]
    fn test_tokenize_errors() {
        let err = Path::parse("M 0 0 X 1 1").unwrap_err();
        assert!(matches!(err, SceneError::Parse(ref msg) if msg.contains("X 1 1")));
        assert!(matches!(Path::parse("M 0 0 L 10-5 3"), Err(SceneError::Parse(_))));
        assert!(matches!(Path::parse("M 1..2 0"), Err(SceneError::Parse(_))));
        let err = Path::parse("M 1e999 0").unwrap_err();
        assert!(matches!(err, SceneError::Parse(ref msg) if msg.contains("1e999")));
    }

    #[test]
    fn test_argument_before_command() {
        let err = Path::parse("10 10 L 5 5").unwrap_err();
        assert!(matches!(err, SceneError::Parse(ref msg) if msg.contains("before first command")));
    }

    #[test]
    fn test_must_start_with_moveto() {
        assert!(matches!(Path::parse("L10 10"), Err(SceneError::Parse(_))));
        assert!(matches!(Path::parse("Z"), Err(SceneError::Parse(_))));
    }

    #[test]
    fn test_wrong_argument_count() {
        assert!(Path::parse("M 0").is_err());
        assert!(Path::parse("M 0 0 L 1 2 3").is_err());
        assert!(Path::parse("M 0 0 Z 5").is_err());
        assert!(Path::parse("M 0 0 L").is_err());
    }

    #[test]
    fn test_empty_path() {
        assert!(Path::parse("").unwrap().is_empty());
        assert!(Path::parse("  \n ").unwrap().is_empty());
    }

    #[test]
    fn test_split_polycommands() {
        let groups = raw_groups("M 0 0 10 0 10 10 m 1 1 2 2 L 1 1 2 2");
        let letters: String = groups.iter().map(|g| g.letter).collect();
        assert_eq!(letters, "MLLmlLL");
        assert_eq!(groups[2].args.as_slice(), &[10.0, 10.0]);
    }

    #[test]
    fn test_arc_argument_coercion() {
        let groups = raw_groups("M0 0 a -5 -6 30 2 0 10 10");
        assert_eq!(groups[1].args.as_slice(), &[5.0, 6.0, 30.0, 1.0, 0.0, 10.0, 10.0]);
    }

    #[test]
    fn test_absolutize_relative() {
        assert_eq!(
            commands(
                "m 1 2 l 3 4 h 5 v -2 c 1 1 2 2 3 3 s 1 0 2 0 q 1 1 2 2 t 1 1 a 1 1 0 0 1 2 2 z"
            ),
            vec![
                Command::MoveTo { x: 1.0, y: 2.0 },
                Command::LineTo { x: 4.0, y: 6.0 },
                Command::LineTo { x: 9.0, y: 6.0 },
                Command::LineTo { x: 9.0, y: 4.0 },
                Command::CurveTo { x1: 10.0, y1: 5.0, x2: 11.0, y2: 6.0, x: 12.0, y: 7.0 },
                Command::SmoothCurveTo { x2: 13.0, y2: 7.0, x: 14.0, y: 7.0 },
                Command::QuadraticCurveTo { x1: 15.0, y1: 8.0, x: 16.0, y: 9.0 },
                Command::SmoothQuadraticCurveTo { x: 17.0, y: 10.0 },
                Command::EllipticalArc {
                    rx: 1.0,
                    ry: 1.0,
                    rotation: 0.0,
                    large_arc: false,
                    sweep: true,
                    x: 19.0,
                    y: 12.0,
                },
                Command::ClosePath,
            ]
        );
    }

    #[test]
    fn test_closepath_restores_subpath_start() {
        assert_eq!(
            commands("M 5 5 l 10 0 z l 0 10"),
            vec![
                Command::MoveTo { x: 5.0, y: 5.0 },
                Command::LineTo { x: 15.0, y: 5.0 },
                Command::ClosePath,
                Command::LineTo { x: 5.0, y: 15.0 },
            ]
        );
    }

    #[test]
    fn test_relative_moveto_polycommand() {
        assert_eq!(
            commands("m 10 10 5 0 0 5"),
            vec![
                Command::MoveTo { x: 10.0, y: 10.0 },
                Command::LineTo { x: 15.0, y: 10.0 },
                Command::LineTo { x: 15.0, y: 15.0 },
            ]
        );
    }

    #[test]
    fn test_horizontal_vertical() {
        let path = Path::parse("M0 0 h10 v10").unwrap();
        let cmds: Vec<Command> = path.commands().copied().collect();
        assert_eq!(cmds[1], Command::LineTo { x: 10.0, y: 0.0 });
        assert_eq!(cmds[2], Command::LineTo { x: 10.0, y: 10.0 });

        let shapes = path.linearize();
        assert_eq!(shapes.len(), 1);
        match &shapes[0] {
            Shape::Polyline(p) => assert_eq!(p.points.len(), 3),
            other => panic!("expected polyline, got {other:?}"),
        }
    }

    #[test]
    fn test_linearize_closed_square() {
        let shapes = Path::parse("M0 0 L10 0 L10 10 Z").unwrap().linearize();
        match &shapes[0] {
            Shape::Polygon(p) => {
                assert_eq!(p.points.len(), 3);
                assert_eq!(p.signed_area(), 50.0);
            }
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn test_linearize_drops_explicit_closing_vertex() {
        let shapes = Path::parse("M0 0 L10 0 L10 10 L0 10 L0 0 Z").unwrap().linearize();
        match &shapes[0] {
            Shape::Polygon(p) => assert_eq!(p.points.len(), 4),
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn test_linearize_repairs_winding() {
        let shapes = Path::parse("M0 0 L0 10 L10 10 L10 0 Z").unwrap().linearize();
        assert_eq!(shapes[0].area(), 100.0);
        match &shapes[0] {
            Shape::Polygon(p) => assert!(p.signed_area() >= 0.0),
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn test_linearize_line_lone_moveto_and_curves() {
        let shapes = Path::parse("M0 0 L5 5 M 1 1 M 2 2 C 9 9 9 9 4 4 A 3 3 0 1 1 8 8")
            .unwrap()
            .linearize();
        assert_eq!(shapes.len(), 3);
        assert_eq!(shapes[0], Shape::Line(Line::new(0.0, 0.0, 5.0, 5.0)));
        assert_eq!(
            shapes[1],
            Shape::Polyline(Polyline::new(vec![Point::new(1.0, 1.0)]))
        );
        // Curves contribute their endpoints only.
        assert_eq!(
            shapes[2],
            Shape::Polyline(Polyline::new(vec![
                Point::new(2.0, 2.0),
                Point::new(4.0, 4.0),
                Point::new(8.0, 8.0),
            ]))
        );
    }

    #[test]
    fn test_subpath_split() {
        let path = Path::parse("M0 0 L1 0 Z M 5 5 L 6 6 m 1 1 l 1 0").unwrap();
        let subpaths = path.subpaths();
        assert_eq!(subpaths.len(), 3);
        assert!(subpaths[0].is_closed());
        assert!(!subpaths[1].is_closed());
        assert_eq!(subpaths[2].commands[0], Command::MoveTo { x: 7.0, y: 7.0 });
    }

    #[test]
    fn test_display_reparses_identically() {
        let data = concat!(
            "m 1 2 l 3 -4 h 5 v -2 c 1 1 2 2 3 3 s 1 0 2 0 q 1 1 2 2 t 1 1 ",
            "a 1 2 15 1 0 2 2 z m 0.25 0.125 1 1"
        );
        let path = Path::parse(data).unwrap();
        let again = Path::parse(&path.to_string()).unwrap();
        assert_eq!(path, again);
        assert_eq!(again.to_string(), path.to_string());
    }

    #[test]
    fn test_command_display() {
        assert_eq!(Command::MoveTo { x: 0.0, y: -1.5 }.to_string(), "M 0 -1.5");
        assert_eq!(Command::ClosePath.to_string(), "Z");
        let arc = Command::EllipticalArc {
            rx: 5.0,
            ry: 5.0,
            rotation: 0.0,
            large_arc: true,
            sweep: false,
            x: 10.0,
            y: 0.0,
        };
        assert_eq!(arc.to_string(), "A 5 5 0 1 0 10 0");
    }

    #[test]
    fn test_bounding_box_includes_control_points() {
        let path = Path::parse("M 0 0 C 0 20 10 20 10 0").unwrap();
        assert_eq!(path.bounding_box(), BoundingBox::new(0.0, 0.0, 10.0, 20.0));
    }

    #[test]
    fn test_path_transform() {
        let path = Path::parse("M 0 0 L 1 0 A 2 3 0 0 1 4 4").unwrap();
        let moved = path.transform(&Transform::translate(10.0, 0.0));
        let cmds: Vec<Command> = moved.commands().copied().collect();
        assert_eq!(cmds[1], Command::LineTo { x: 11.0, y: 0.0 });
        match cmds[2] {
            Command::EllipticalArc { rx, ry, x, y, .. } => {
                assert_eq!((rx, ry, x, y), (2.0, 3.0, 14.0, 4.0));
            }
            other => panic!("expected arc, got {other:?}"),
        }
    }
}
