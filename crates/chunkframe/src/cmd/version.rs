use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("chunkframe {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: chunkframe");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "build_target: {}",
        option_env!("CHUNKFRAME_BUILD_TARGET").unwrap_or("unknown")
    );
    println!(
        "build_profile: {}",
        option_env!("CHUNKFRAME_BUILD_PROFILE").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("features: async={}, cli=true", cfg!(feature = "async"));
    println!(
        "defaults: max_bytes={}, read_chunk={}, delimiter={:?}",
        chunkframe_frame::DEFAULT_MAX_BYTES,
        chunkframe_frame::DEFAULT_READ_CHUNK_SIZE,
        chunkframe_frame::DEFAULT_DELIMITER
    );

    Ok(SUCCESS)
}
