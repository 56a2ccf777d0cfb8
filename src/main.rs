use image::error::ImageError;
use log::{debug, info, warn};

use rquadtree::error::ParseError;
use rquadtree::{metrics, ColorIndex, Quadtree};

use std::path::Path;
use std::str::FromStr;

/// Helper function for `main`.
fn error_exit(msg: &str, code: i32) -> ! {
	eprintln!("{}", msg);
	std::process::exit(code)
}

fn load_image(path: &str) -> image::RgbImage {
	match image::open(path) {
		Ok(i) => i,
		Err(e) => {
			let (msg, code) = match e {
				ImageError::Decoding(_) | ImageError::Unsupported(_) => ("Invalid image data", 4),
				ImageError::IoError(_) => ("File not found or could not be read", 3),
				_ => ("An error occurred", 10)
			};
			error_exit(&format!("{}: {}", path, msg), code)
		}
	}.into_rgb8()
}

fn save_image(img: &image::RgbImage, path: &str) {
	match img.save(path) {
		Ok(_) => debug!("wrote {}", path),
		Err(_) => error_exit(&format!("Could not save {}", path), 3)
	}
}

fn write_text(path: &str, text: &str) {
	match std::fs::write(path, text) {
		Ok(_) => debug!("wrote {}", path),
		Err(_) => error_exit(&format!("Could not write to {}", path), 3)
	}
}

fn parse_arg<T: FromStr>(value: &str, what: &str) -> T {
	match value.parse() {
		Ok(n) => n,
		Err(_) => error_exit(&format!("Invalid value {:?} for {}", value, what), 2)
	}
}

/// Size ratio and mean squared error of `compressed` against `original`.
fn report(original_path: &str, original: &image::RgbImage, compressed_path: &str, compressed: &image::RgbImage) {
	match metrics::size_ratio(original_path, compressed_path) {
		Ok(r) => println!("size ratio: {:.2}%", r),
		Err(e) => warn!("could not compare file sizes: {}", e)
	}
	match metrics::mean_squared_error(original, compressed) {
		Ok(mse) => println!("mean squared error: {:.2}%", mse),
		Err(e) => error_exit(&e.to_string(), 2)
	}
}

fn compress(m: &clap::ArgMatches) {
	let input = m.value_of("INPUT").unwrap();
	let method = m.value_of("METHOD").unwrap().to_lowercase();
	let param = m.value_of("PARAM").unwrap();
	let source = load_image(input);

	let mut tree = Quadtree::from_source(&source);
	let before = tree.leaf_count();
	info!("{}x{} image, {} leaves, depth {}", tree.width(), tree.height(), before, tree.depth());

	let result = match method.as_str() {
		"lambda" => tree.compress_lambda(parse_arg(param, "lambda")),
		"phi" => tree.compress_phi(parse_arg(param, "phi")),
		_ => error_exit("METHOD must be one of lambda or phi", 2)
	};
	if let Err(e) = result {
		error_exit(&e.to_string(), 2)
	}
	info!("{} leaves after {} compression", tree.leaf_count(), method);

	let prefix = match m.value_of("output") {
		Some(p) => p.to_string(),
		None => Path::new(input).with_extension("").to_string_lossy().into_owned()
	};
	let stem = format!("{}-{}{}", prefix, method, param);
	let output = tree.to_image();
	let png_path = format!("{}.png", stem);
	save_image(&output, &png_path);
	write_text(&format!("{}R.txt", stem), &tree.to_text());

	let index = ColorIndex::from_quadtree(&tree);
	info!("{} distinct colors in the compressed tree", index.len());
	write_text(&format!("{}AVL.txt", stem), &index.to_text());

	println!("leaves: {} -> {}", before, tree.leaf_count());
	report(input, &source, &png_path, &output);
}

fn index(m: &clap::ArgMatches) {
	let input = m.value_of("INPUT").unwrap();
	let source = load_image(input);
	let mut index = if m.is_present("from-tree") {
		ColorIndex::from_quadtree(&Quadtree::from_source(&source))
	} else {
		ColorIndex::from_source(&source)
	};
	info!("{} distinct colors, height {}", index.len(), index.height());

	for hex in m.values_of("add").into_iter().flatten() {
		match index.insert_hex(hex) {
			Ok(true) => debug!("added {}", hex),
			Ok(false) => warn!("{} is already indexed", hex),
			Err(e) => error_exit(&e.to_string(), 2)
		}
	}
	for hex in m.values_of("remove").into_iter().flatten() {
		match index.remove_hex(hex) {
			Ok(true) => debug!("removed {}", hex),
			Ok(false) => warn!("{} is not indexed", hex),
			Err(e) => error_exit(&e.to_string(), 2)
		}
	}
	for hex in m.values_of("search").into_iter().flatten() {
		match index.search_hex(hex) {
			Ok(Some(_)) => println!("{}: found", hex),
			Ok(None) => println!("{}: not found", hex),
			Err(e) => error_exit(&e.to_string(), 2)
		}
	}

	match m.value_of("output") {
		Some(path) => write_text(path, &index.to_text()),
		None => println!("{}", index)
	}
}

fn render(m: &clap::ArgMatches) {
	let input = m.value_of("TEXT").unwrap();
	let width = parse_arg(m.value_of("WIDTH").unwrap(), "width");
	let height = parse_arg(m.value_of("HEIGHT").unwrap(), "height");
	let text = match std::fs::read_to_string(input) {
		Ok(t) => t,
		Err(_) => error_exit("File not found or could not be read", 3)
	};
	let tree = match Quadtree::from_text(&text, width, height) {
		Ok(t) => t,
		Err(e @ ParseError::TooLarge { .. }) => error_exit(&e.to_string(), 2),
		Err(e) => error_exit(&format!("Invalid quadtree text: {}", e), 4)
	};
	info!("{} leaves, depth {}", tree.leaf_count(), tree.depth());
	save_image(&tree.to_image(), m.value_of("OUTPUT").unwrap());
}

fn compare(m: &clap::ArgMatches) {
	let (a, b) = (m.value_of("A").unwrap(), m.value_of("B").unwrap());
	report(a, &load_image(a), b, &load_image(b));
}

/// `clap`-based CLI for compressing images through quadtrees and inspecting
/// their colors.
///
/// May exit process with status code if there are errors:
///
/// 1: `clap` error
///
/// 2: invalid arguments
///
/// 3: file I/O issues
///
/// 4: invalid image or quadtree text data
///
/// 10: other, potentially unknown error
fn main() {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let clap_matches = clap::App::new("rquadtree")
		.version("0.1.0")
		.author("vkcz")
		.about("Compresses images with region quadtrees and indexes their colors.")
		.setting(clap::AppSettings::SubcommandRequiredElseHelp)
		.subcommand(clap::SubCommand::with_name("compress")
			.about("Compresses an image and writes the result as PNG, quadtree text and color index text")
			.arg_from_usage("-o, --output=[PREFIX] 'Prefix of the output files; defaults to INPUT without its extension'")
			.arg_from_usage("<INPUT> 'Path to input image'")
			.arg_from_usage("<METHOD> 'Compression method, lambda (quality bound) or phi (leaf budget)'")
			.arg_from_usage("<PARAM> 'Lambda in [0, 255] or phi greater than 0'"))
		.subcommand(clap::SubCommand::with_name("index")
			.about("Builds the color index of an image and edits or queries it")
			.arg_from_usage("-t, --from-tree 'Index the leaves of the image quadtree, padding included'")
			.arg(clap::Arg::from_usage("-s, --search=[HEX]... 'Color to look up; may be repeated'").number_of_values(1))
			.arg(clap::Arg::from_usage("-a, --add=[HEX]... 'Color to insert; may be repeated'").number_of_values(1))
			.arg(clap::Arg::from_usage("-r, --remove=[HEX]... 'Color to remove; may be repeated'").number_of_values(1))
			.arg_from_usage("-o, --output=[OUTPUT] 'Write the index text to OUTPUT instead of stdout'")
			.arg_from_usage("<INPUT> 'Path to input image'"))
		.subcommand(clap::SubCommand::with_name("render")
			.about("Rebuilds an image from quadtree text")
			.arg_from_usage("<TEXT> 'Path to quadtree text file'")
			.arg_from_usage("<WIDTH> 'Width of the original image'")
			.arg_from_usage("<HEIGHT> 'Height of the original image'")
			.arg_from_usage("<OUTPUT> 'Path to output image'"))
		.subcommand(clap::SubCommand::with_name("compare")
			.about("Prints size ratio and mean squared error of B against A")
			.arg_from_usage("<A> 'Path to original image'")
			.arg_from_usage("<B> 'Path to compressed image'"))
		.get_matches_safe()
		.unwrap_or_else(|e| match e.kind {
			clap::ErrorKind::HelpDisplayed | clap::ErrorKind::VersionDisplayed => e.exit(),
			_ => error_exit(&e.message, 1)
		});

	match clap_matches.subcommand() {
		("compress", Some(m)) => compress(m),
		("index", Some(m)) => index(m),
		("render", Some(m)) => render(m),
		("compare", Some(m)) => compare(m),
		_ => error_exit("A subcommand is required", 2)
	}
}
