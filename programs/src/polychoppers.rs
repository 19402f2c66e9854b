use std::fs;
use std::io::{self, Read, Write};

#[macro_use]
extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate nom;
use nom::IResult;
use nom::character::complete::{char, space0, space1};
use nom::combinator::{all_consuming, map};
use nom::multi::separated_list1;
use nom::number::complete::double;
use nom::sequence::{delimited, separated_pair};
extern crate termcolor;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

extern crate polychoppers;
use polychoppers::errors::{Error, ErrorKind, Result};
use polychoppers::shapeops::{self, render, BooleanOpType, Contour, Polygon};
use polychoppers::Point;

fn main() {
    match run() {
        Ok(()) => {}
        Err(err) => {
            drop(write_err(err));
            std::process::exit(1);
        }
    }
}

fn write_err(err: Error) -> Result<()> {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(&mut stderr, "error: ")?;
    stderr.set_color(&ColorSpec::new())?;
    writeln!(&mut stderr, "{}", err)?;
    for cause in err.iter().skip(1) {
        writeln!(&mut stderr, "  caused by: {}", cause)?;
    }
    if let Some(backtrace) = err.backtrace() {
        writeln!(&mut stderr, "{:?}", backtrace)?;
    }
    Ok(())
}

fn run() -> Result<()> {
    let args = clap_app!(polychoppers =>
        (about: "Intersect, unite, subtract, or xor two polygons")
        (@arg verbose: -v --verbose +multiple "Log what the sweep is doing; repeat for more detail")
        (@arg svg: -o --svg +takes_value "Also draw the inputs and the result to this SVG file")
        (@arg operation: +required "One of: intersection, union, difference, xor")
        (@arg subject: +required "Subject polygon file, or - for stdin")
        (@arg clipping: +required "Clipping polygon file, or - for stdin")
    ).get_matches();

    let level = match args.occurrences_of("verbose") {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    // Positional arguments are required, so clap won't let these be missing
    let operation: BooleanOpType = args.value_of("operation").unwrap_or_default().parse()?;
    let subject = read_polygon(args.value_of("subject").unwrap_or("-"))?;
    let clipping = read_polygon(args.value_of("clipping").unwrap_or("-"))?;
    info!("{} contours {} {} contours", subject.len(), operation, clipping.len());

    let result = shapeops::compute(&subject, &clipping, operation);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_polygon(&mut out, &result)?;

    if let Some(filename) = args.value_of("svg") {
        let doc = render::document(&[
            ("subject", &subject),
            ("clipping", &clipping),
            ("result", &result),
        ]);
        render::save(filename, &doc)?;
    }

    Ok(())
}

fn read_polygon(filename: &str) -> Result<Polygon> {
    let text = match filename {
        "-" => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            text
        }
        f => fs::read_to_string(f)?,
    };
    return parse_polygon(&text);
}


// Polygon text format: one contour per line, as whitespace-separated "x,y" pairs.  Anything
// after a # is a comment, and blank lines are ignored.

fn point(input: &str) -> IResult<&str, Point> {
    map(
        separated_pair(double, delimited(space0, char(','), space0), double),
        |(x, y)| Point::new(x, y),
    )(input)
}

fn contour_line(input: &str) -> IResult<&str, Vec<Point>> {
    all_consuming(delimited(space0, separated_list1(space1, point), space0))(input)
}

fn parse_polygon(text: &str) -> Result<Polygon> {
    let mut polygon = Polygon::new();
    for (i, raw_line) in text.lines().enumerate() {
        let line = match raw_line.find('#') {
            Some(comment) => &raw_line[.. comment],
            None => raw_line,
        };
        if line.trim().is_empty() {
            continue;
        }

        let points = match contour_line(line) {
            Ok((_, points)) => points,
            Err(_) => {
                return Err(ErrorKind::ParseError(i + 1, raw_line.to_string()).into());
            }
        };
        let contour = Contour::from_points(points);
        if contour.len() < 3 {
            warn!("line {}: skipping contour with fewer than three distinct points", i + 1);
            continue;
        }
        polygon.push(contour);
    }
    return Ok(polygon);
}

fn write_polygon<W: Write>(out: &mut W, polygon: &Polygon) -> Result<()> {
    writeln!(out, "# {} contours, area {}", polygon.len(), polygon.area())?;
    for (i, contour) in polygon.contours().iter().enumerate() {
        writeln!(out, "# contour #{}: {}, {}, area {}, holes {:?}",
            i,
            if contour.external() { "external" } else { "hole" },
            if contour.counterclockwise() { "counterclockwise" } else { "clockwise" },
            contour.area(),
            contour.holes())?;
        let points: Vec<_> = contour.points().iter().map(|p| format!("{},{}", p.x, p.y)).collect();
        writeln!(out, "{}", points.join(" "))?;
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_points() {
        let (rest, p) = point("1.5 , -2e1").unwrap();
        assert_eq!(rest, "");
        assert_eq!(p, Point::new(1.5, -20.));

        let (_, points) = contour_line("  0,0 1,0\t1,1   ").unwrap();
        assert_eq!(points, vec![Point::new(0., 0.), Point::new(1., 0.), Point::new(1., 1.)]);
        assert!(contour_line("0,0 1").is_err());
    }

    #[test]
    fn parse_file() {
        let text = "# two squares\n\n0,0 4,0 4,4 0,4\n1,1 1,3 3,3 3,1  # a hole\n5,5 6,6\n";
        let polygon = parse_polygon(text).unwrap();
        assert_eq!(polygon.len(), 2);
        assert_eq!(polygon[1].points()[2], Point::new(3., 3.));

        match parse_polygon("0,0 1,0 1,1\n0,0 oops\n") {
            Err(Error(ErrorKind::ParseError(line, text), _)) => {
                assert_eq!(line, 2);
                assert_eq!(text, "0,0 oops");
            }
            other => panic!("unexpected {:?}", other.map(|p| p.len())),
        }
    }

    #[test]
    fn output_reads_back() {
        let polygon = parse_polygon("0,0 4,0 4,4 0,4\n1,1 1,3 3,3 3,1\n").unwrap();
        let result = shapeops::compute(&polygon, &Polygon::new(), BooleanOpType::Union);
        let mut out = Vec::new();
        write_polygon(&mut out, &result).unwrap();
        let text = String::from_utf8(out).unwrap();
        let reread = parse_polygon(&text).unwrap();
        assert_eq!(reread, result);
        assert_eq!(reread.area(), 12.);
    }
}
