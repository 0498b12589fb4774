use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use jbotree::dictionary::WordList;
use jbotree::{Err, Format, Mode, Node, PlaceTable, Renderer};

fn usage(prog_name: &str) -> String {
  format!(
    r"Usage: {} FILE [options]

Renders a parse tree (JSON, `-` for stdin).

Options:
  -h, --help             Print this message
  --format NAME          brackets (default), gloss, raw, or rawstructure
  -s                     Show selma'o names
  -f, --no-f             Show (default) or hide elided terminators
  -p                     Show place tables
  --places FILE          Place table used by the gloss format (JSON)
  --dictionary FILE      Word list used by the gloss format (JSON)",
    prog_name
  )
}

struct Args {
  filename: String,
  mode: Mode,
  places: Option<String>,
  dictionary: Option<String>,
}

impl Args {
  fn make_error_message(msg: &str, prog_name: impl AsRef<str>) -> String {
    format!("argument error: {}.\n\n{}", msg, usage(prog_name.as_ref()))
  }

  fn parse(v: Vec<String>) -> Result<Self, String> {
    let mut iter = v.into_iter();
    let Some(prog_name) = iter.next() else {
      return Err(Self::make_error_message("bad argument vector", "jbotree"));
    };

    let mut filename: Option<String> = None;
    let mut mode = Mode::new(Format::Brackets);
    let mut places = None;
    let mut dictionary = None;

    while let Some(o) = iter.next() {
      match o.as_str() {
        "-h" | "--help" => {
          println!("{}", usage(&prog_name));
          process::exit(0);
        }
        "-s" => mode.s = true,
        "-f" => mode.f = true,
        "--no-f" => mode.f = false,
        "-p" => mode.p = true,
        "--format" | "--places" | "--dictionary" => {
          let Some(value) = iter.next() else {
            return Err(Self::make_error_message(
              &format!("{} needs a value", o),
              prog_name,
            ));
          };
          match o.as_str() {
            "--format" => mode.format = value,
            "--places" => places = Some(value),
            _ => dictionary = Some(value),
          }
        }
        _ if filename.is_none() => filename = Some(o.clone()),
        _ => return Err(Self::make_error_message("invalid arguments", prog_name)),
      }
    }

    if let Some(filename) = filename {
      Ok(Self {
        filename,
        mode,
        places,
        dictionary,
      })
    } else {
      Err(Self::make_error_message("missing filename", prog_name))
    }
  }
}

fn read_tree(filename: &str) -> Result<Node, Err> {
  let src = if filename == "-" {
    let mut src = String::new();
    io::stdin().read_to_string(&mut src)?;
    src
  } else {
    fs::read_to_string(filename)?
  };
  Ok(serde_json::from_str(&src)?)
}

fn main() -> Result<(), Err> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(io::stderr)
    .init();

  let opts = match Args::parse(env::args().collect()) {
    Ok(opts) => opts,
    Err(msg) => {
      eprintln!("{}", msg);
      process::exit(255);
    }
  };

  let mut renderer = Renderer::new();
  if let Some(path) = &opts.places {
    let places = PlaceTable::read_from_file(path)?;
    debug!(path = path.as_str(), entries = places.len(), "loaded place table");
    renderer = renderer.with_places(places);
  }
  if let Some(path) = &opts.dictionary {
    let words = WordList::read_from_file(path)?;
    debug!(path = path.as_str(), entries = words.len(), "loaded dictionary");
    renderer = renderer.with_dictionary(words);
  }

  let tree = read_tree(&opts.filename)?;
  println!("{}", renderer.format(&tree, &opts.mode)?);

  Ok(())
}
