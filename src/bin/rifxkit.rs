use std::{
    collections::BTreeMap,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "rifxkit", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the container format and payload counts.
    Info(InputArgs),
    /// List the resource table.
    List(ListArgs),
    /// List cast libraries and their members.
    Cast(ListArgs),
    /// Write every exportable resource into a directory.
    Export(ExportArgs),
    /// Write a classic container from a directory of `<tag>_<id>.*` files.
    Pack(PackArgs),
}

#[derive(Parser, Debug)]
struct InputArgs {
    /// Input movie or cast file.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct ListArgs {
    /// Input movie or cast file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Print JSON instead of one line per item.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input movie or cast file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory (created if missing).
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct PackArgs {
    /// Directory of resource files.
    #[arg(long = "in")]
    in_dir: PathBuf,

    /// Output container path.
    #[arg(long)]
    out: PathBuf,

    /// Writer options JSON (`endian`, `codec`, `director_version`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a big-endian `RIFX` container regardless of the config.
    #[arg(long)]
    big_endian: bool,
}

/// Extensions of derived views written next to raw payloads; `pack` skips them.
const DERIVED_EXTENSIONS: [&str; 2] = ["md", "ls"];

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Info(args) => cmd_info(args),
        Command::List(args) => cmd_list(args),
        Command::Cast(args) => cmd_cast(args),
        Command::Export(args) => cmd_export(args),
        Command::Pack(args) => cmd_pack(args),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn read_context(path: &Path) -> anyhow::Result<rifxkit::ReadContext> {
    let data = std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
    rifxkit::ReadContext::open(data, &file_name(path))
        .with_context(|| format!("open container '{}'", path.display()))
}

fn open_movie(path: &Path) -> anyhow::Result<rifxkit::MovieArchive> {
    let ctx = read_context(path)?;
    Ok(rifxkit::MovieArchive::assemble(&ctx))
}

fn cmd_info(args: InputArgs) -> anyhow::Result<()> {
    let ctx = read_context(&args.in_path)?;
    let movie = rifxkit::MovieArchive::assemble(&ctx);
    let format = movie.format();

    println!("file: {}", movie.file_name());
    println!("codec: {}", format.codec.tag());
    println!("endian: {:?}", format.endian);
    println!("signature offset: {}", format.signature_offset);
    match movie.director_version() {
        Some(v) => println!("version: {v}"),
        None => println!("version: unknown"),
    }
    if let Some(v) = &format.afterburner_version {
        println!("afterburner: {v}");
    }
    println!("resources: {}", ctx.table().entries().len());
    println!("cast libraries: {}", movie.cast_libraries().len());
    println!("bitmaps: {}", movie.bitmaps().len());
    println!("sounds: {}", movie.sounds().len());
    println!("texts: {}", movie.texts().len());
    println!("scripts: {}", movie.scripts().len());
    println!("shapes: {}", movie.shapes().len());
    Ok(())
}

fn cmd_list(args: ListArgs) -> anyhow::Result<()> {
    let ctx = read_context(&args.in_path)?;
    let entries = ctx.table().entries();
    if args.json {
        println!("{}", serde_json::to_string_pretty(entries)?);
        return Ok(());
    }
    for e in entries {
        let free = if e.is_free() { " (free)" } else { "" };
        println!("{:>6} {} {:>10}{free}", e.id, e.tag, e.size);
    }
    Ok(())
}

fn cmd_cast(args: ListArgs) -> anyhow::Result<()> {
    let movie = open_movie(&args.in_path)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(movie.cast_libraries())?);
        return Ok(());
    }
    for cast in movie.cast_libraries() {
        println!("cast {} ({} members)", cast.resource_id, cast.members.len());
        for m in &cast.members {
            let attached: Vec<&str> = [
                ("bitmap", m.bitmap.is_some()),
                ("text", m.text.is_some()),
                ("field", m.field.is_some()),
                ("sound", m.sound.is_some()),
                ("script", m.script.is_some()),
                ("shape", m.shape.is_some()),
            ]
            .into_iter()
            .filter_map(|(label, present)| present.then_some(label))
            .collect();
            println!(
                "  #{:<4} {:<6} {:?} '{}' [{}]",
                m.slot,
                m.resource_id,
                m.member_type,
                m.name,
                attached.join(", ")
            );
        }
    }
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let movie = open_movie(&args.in_path)?;
    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    let mut extensions: BTreeMap<i32, &str> = BTreeMap::new();
    for b in movie.bitmaps() {
        extensions.insert(b.resource_id, b.kind.extension());
    }
    for s in movie.sounds() {
        extensions.insert(s.resource_id, s.kind.extension());
    }

    let mut written = 0usize;
    for raw in movie.raw_resources() {
        let ext = extensions.get(&raw.id).copied().unwrap_or("bin");
        let path = args.out.join(format!("{}_{:04}.{ext}", raw.tag, raw.id));
        write_file(&path, &raw.bytes)?;
        written += 1;
    }

    // Derived views sit beside the raw payload they were decoded from.
    for t in movie.texts() {
        let path = args
            .out
            .join(format!("{}_{:04}.md", raw_tag(&movie, t.resource_id), t.resource_id));
        write_file(&path, t.markup.as_bytes())?;
    }
    for s in movie.scripts().iter().filter(|s| !s.text.is_empty()) {
        let path = args
            .out
            .join(format!("{}_{:04}.ls", raw_tag(&movie, s.member_id), s.member_id));
        write_file(&path, s.text.as_bytes())?;
    }

    eprintln!("wrote {written} resources to {}", args.out.display());
    Ok(())
}

fn raw_tag(movie: &rifxkit::MovieArchive, id: i32) -> rifxkit::Tag {
    movie
        .raw_resources()
        .iter()
        .find(|r| r.id == id)
        .map(|r| r.tag)
        .unwrap_or(rifxkit::Tag::CAST_MEMBER)
}

fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}

fn read_options(args: &PackArgs) -> anyhow::Result<rifxkit::WriterOptions> {
    let options = match &args.config {
        Some(path) => {
            let f = File::open(path)
                .with_context(|| format!("open writer config '{}'", path.display()))?;
            serde_json::from_reader(BufReader::new(f)).with_context(|| "parse writer config JSON")?
        }
        None => {
            let ext = args
                .out
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default();
            rifxkit::WriterOptions::for_extension(&ext)
        }
    };
    Ok(if args.big_endian {
        options.with_endian(rifxkit::Endian::Big)
    } else {
        options
    })
}

fn cmd_pack(args: PackArgs) -> anyhow::Result<()> {
    let options = read_options(&args)?;

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(&args.in_dir)
        .with_context(|| format!("read input dir '{}'", args.in_dir.display()))?
    {
        let path = entry?.path();
        let derived = path
            .extension()
            .is_some_and(|e| DERIVED_EXTENSIONS.iter().any(|d| e.eq_ignore_ascii_case(d)));
        if path.is_file() && !derived {
            paths.push(path);
        }
    }
    paths.sort();

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = std::fs::read(&path).with_context(|| format!("read '{}'", path.display()))?;
        files.push(rifxkit::ResourceFile::new(file_name(&path), bytes));
    }
    anyhow::ensure!(!files.is_empty(), "no resource files in '{}'", args.in_dir.display());

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let mut out =
        File::create(&args.out).with_context(|| format!("create '{}'", args.out.display()))?;
    rifxkit::ContainerWriter::new(options)
        .write(&mut out, &files)
        .with_context(|| format!("write container '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
