use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "prebundle",
    about = "Prebundle: inspect and edit package entrypoint manifests",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// How to find the package that owns an entrypoint.
#[derive(Args, Clone, Debug)]
pub struct PackageArgs {
    /// Package root directory (defaults to the entrypoint directory)
    #[arg(long)]
    pub package_dir: Option<String>,

    /// Package name (defaults to `name` in the package root manifest)
    #[arg(long)]
    pub package_name: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the typed entrypoint fields of a manifest
    Show {
        /// Entrypoint directory containing package.json
        #[arg(default_value = ".")]
        dir: String,

        #[command(flatten)]
        package: PackageArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate an entrypoint and try to promote it to strict
    Check {
        /// Entrypoint directory containing package.json
        #[arg(default_value = ".")]
        dir: String,

        #[command(flatten)]
        package: PackageArgs,

        /// Treat missing required fields as errors
        #[arg(long)]
        strict: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write entrypoint fields back to package.json
    Set {
        /// Entrypoint directory containing package.json
        #[arg(default_value = ".")]
        dir: String,

        /// Primary output (`main`)
        #[arg(long)]
        main: Option<String>,

        /// ESM output (`module`)
        #[arg(long)]
        module: Option<String>,

        /// UMD output (`umd:main`)
        #[arg(long)]
        umd_main: Option<String>,

        /// UMD global name (`prebundle.umdName`)
        #[arg(long, conflicts_with = "clear_umd_name")]
        umd_name: Option<String>,

        /// Remove `prebundle.umdName`
        #[arg(long)]
        clear_umd_name: bool,

        /// Source entry (`prebundle.source`)
        #[arg(long)]
        source: Option<String>,

        #[command(flatten)]
        package: PackageArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve the source entry to a file
    Source {
        /// Entrypoint directory containing package.json
        #[arg(default_value = ".")]
        dir: String,

        #[command(flatten)]
        package: PackageArgs,
    },
}
