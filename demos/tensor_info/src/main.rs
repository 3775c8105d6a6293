use argh::FromArgs;
use std::path::{Path, PathBuf};

use ndtensor::{FileElement, Tensor};

#[derive(FromArgs)]
/// Load a tensor file and print its shape and contents
struct Args {
    /// path to a tensor file (.txt or a binary type extension such as .f64)
    #[argh(option, short = 'i')]
    tensor_path: PathBuf,

    /// element type of a .txt file, as its binary extension (default: f64)
    #[argh(option, short = 't', default = "String::from(\"f64\")")]
    dtype: String,

    /// only print the shape
    #[argh(switch, short = 's')]
    shape_only: bool,
}

fn show<T: FileElement>(path: &Path, shape_only: bool) -> Result<(), Box<dyn std::error::Error>> {
    let tensor = Tensor::<T>::read(path)?;

    println!("rank: {}", tensor.rank());
    println!("shape: {:?}", tensor.shape());
    println!("numel: {}", tensor.numel());
    if !shape_only {
        println!("{tensor}");
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let ext = args
        .tensor_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    // a .txt file carries no type, so the element type comes from the command line
    let dtype = if ext == "txt" {
        args.dtype.to_ascii_lowercase()
    } else {
        ext
    };
    log::debug!("reading {} as {dtype}", args.tensor_path.display());

    let path = args.tensor_path.as_path();
    match dtype.as_str() {
        "f32" => show::<f32>(path, args.shape_only),
        "f64" | "f80" => show::<f64>(path, args.shape_only),
        "uc" => show::<u8>(path, args.shape_only),
        "sc" => show::<i8>(path, args.shape_only),
        "us" => show::<u16>(path, args.shape_only),
        "s" => show::<i16>(path, args.shape_only),
        "u" => show::<u32>(path, args.shape_only),
        "int" => show::<i32>(path, args.shape_only),
        "ul" | "ull" => show::<u64>(path, args.shape_only),
        "l" | "ll" => show::<i64>(path, args.shape_only),
        other => Err(format!("unsupported element type: {other}").into()),
    }
}
