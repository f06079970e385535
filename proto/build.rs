use std::path::PathBuf;

// The generated stubs are checked in under `gen/` so building this crate
// does not need `protoc`. Set PUBLIC_API_REGENERATE=1 after editing the
// schema to rewrite them.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-env-changed=PUBLIC_API_REGENERATE");
    if std::env::var_os("PUBLIC_API_REGENERATE").is_none() {
        return Ok(());
    }

    let root = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR")?);
    let protos = [
        root.join("gitpod/experimental/v1/pagination.proto"),
        root.join("gitpod/experimental/v1/projects.proto"),
        root.join("gitpod/experimental/v1/stats.proto"),
    ];
    for proto in &protos {
        println!("cargo:rerun-if-changed={}", proto.display());
    }

    connect_build::configure()
        .out_dir(root.join("gen"))
        .compile_protos(&protos, &[root])?;
    Ok(())
}
