use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use xn_core::{Precision, Value, coerce, decode, encode, safe_divide};

#[derive(Parser)]
#[command(name = "xn", about = "Extended-number calculator")]
struct Cli {
    /// Parse operands in float mode (overrides XN_PRECISION)
    #[arg(long, global = true)]
    float: bool,

    /// Print JSON wire records instead of display text
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a binary operator: + - * / ^ (or add sub mul div pow)
    Eval {
        #[arg(allow_hyphen_values = true)]
        lhs: String,
        #[arg(allow_hyphen_values = true)]
        op: String,
        #[arg(allow_hyphen_values = true)]
        rhs: String,
    },

    /// Apply a function: neg abs sign log exp sin cos sqrt
    Apply {
        function: String,
        #[arg(allow_hyphen_values = true)]
        operand: String,
    },

    /// Order two real values, printing <, = or >
    Compare {
        #[arg(allow_hyphen_values = true)]
        a: String,
        #[arg(allow_hyphen_values = true)]
        b: String,
    },

    /// Print the JSON wire record of a value
    Encode {
        #[arg(allow_hyphen_values = true)]
        operand: String,
    },

    /// Parse a JSON wire record
    Decode {
        /// Wire record, e.g. '{"kind":"undefined","precision_mode":"exact"}'
        #[arg(id = "record", value_name = "JSON")]
        json: String,
    },

    /// Walk through a few reference computations
    Demo,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

/// `--float` wins; otherwise `XN_PRECISION`, defaulting to exact.
fn resolve_precision(cli: &Cli) -> Result<Precision> {
    if cli.float {
        return Ok(Precision::Float);
    }
    let Ok(mode) = std::env::var("XN_PRECISION") else {
        return Ok(Precision::Exact);
    };
    match mode.trim().to_ascii_lowercase().as_str() {
        "" | "exact" => Ok(Precision::Exact),
        "float" => Ok(Precision::Float),
        other => bail!("invalid XN_PRECISION {other:?} (expected \"exact\" or \"float\")"),
    }
}

/// Operand text: the display syntax (`3/4`, `1+2i`, `inf(2)`), or JSON
/// (`[1, 2]`, a wire record).
fn parse_operand(text: &str, precision: Precision) -> Result<Value> {
    let trimmed = text.trim();
    if trimmed.starts_with(['{', '[']) {
        let json: serde_json::Value =
            serde_json::from_str(trimmed).with_context(|| format!("invalid JSON operand {text:?}"))?;
        return coerce(&json, precision).with_context(|| format!("invalid operand {text:?}"));
    }
    let value: Value = trimmed
        .parse()
        .with_context(|| format!("invalid operand {text:?}"))?;
    Ok(value.with_precision(precision))
}

fn emit(cli: &Cli, value: &Value) -> Result<()> {
    if cli.json {
        println!("{}", encode(value).context("failed to encode result")?);
    } else {
        println!("{value}");
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let precision = resolve_precision(&cli)?;
    tracing::debug!(?precision, "resolved precision mode");

    match &cli.command {
        Commands::Eval { lhs, op, rhs } => cmd_eval(&cli, precision, lhs, op, rhs),
        Commands::Apply { function, operand } => cmd_apply(&cli, precision, function, operand),
        Commands::Compare { a, b } => cmd_compare(precision, a, b),
        Commands::Encode { operand } => cmd_encode(precision, operand),
        Commands::Decode { json } => cmd_decode(&cli, json),
        Commands::Demo => cmd_demo(),
    }
}

fn cmd_eval(cli: &Cli, precision: Precision, lhs: &str, op: &str, rhs: &str) -> Result<()> {
    let a = parse_operand(lhs, precision)?;
    let b = parse_operand(rhs, precision)?;
    tracing::debug!(%a, %b, kind_a = %a.kind(), kind_b = %b.kind(), "eval {op}");

    let result = match op {
        "+" | "add" => a.add(&b),
        "-" | "sub" => a.sub(&b),
        "*" | "x" | "mul" => a.mul(&b),
        "/" | "div" => a.div(&b),
        "^" | "**" | "pow" => a.pow(&b),
        other => bail!("unknown operator {other:?} (expected + - * / ^)"),
    };
    if result.is_undefined() {
        tracing::info!("{a} {op} {b} is indeterminate");
    }
    emit(cli, &result)
}

fn cmd_apply(cli: &Cli, precision: Precision, function: &str, operand: &str) -> Result<()> {
    let x = parse_operand(operand, precision)?;
    tracing::debug!(%x, kind = %x.kind(), "apply {function}");

    let result = match function {
        "neg" => x.negate(),
        "abs" => x.abs(),
        "sign" => x.sign().with_context(|| format!("sign is not defined for {x}"))?,
        "log" => x.log(),
        "exp" => x.exp(),
        "sin" => x.sin(),
        "cos" => x.cos(),
        "sqrt" => x.sqrt(),
        other => bail!("unknown function {other:?} (expected neg abs sign log exp sin cos sqrt)"),
    };
    emit(cli, &result)
}

fn cmd_compare(precision: Precision, a: &str, b: &str) -> Result<()> {
    let a = parse_operand(a, precision)?;
    let b = parse_operand(b, precision)?;
    let symbol = match a.compare(&b).context("cannot compare")? {
        std::cmp::Ordering::Less => "<",
        std::cmp::Ordering::Equal => "=",
        std::cmp::Ordering::Greater => ">",
    };
    println!("{symbol}");
    Ok(())
}

fn cmd_encode(precision: Precision, operand: &str) -> Result<()> {
    let v = parse_operand(operand, precision)?;
    println!("{}", encode(&v).context("failed to encode value")?);
    Ok(())
}

fn cmd_decode(cli: &Cli, json: &str) -> Result<()> {
    let v = decode(json).context("failed to decode wire record")?;
    tracing::debug!(kind = %v.kind(), precision = ?v.precision(), "decoded");
    emit(cli, &v)
}

fn cmd_demo() -> Result<()> {
    let two = Value::from(2);
    let three = Value::from(3);

    println!("Real arithmetic:");
    println!("  2 + 3 = {}", &two + 3);
    println!("  2.0 + 1.5 = {}\n", Value::from(2.0) + 1.5);

    let res = two.pow(&Value::from(1.5));
    println!("Float exponent on real:");
    println!("  2 ^ 1.5 = {res} (precision={:?})\n", res.precision());

    let root = Value::from(-2).pow(&Value::from(0.5));
    println!("Negative real to float exponent:");
    println!("  (-2) ^ 0.5 = {root} (kind={})\n", root.kind());

    let c1 = Value::from_complex(1, 1, false)?;
    let c2 = Value::from_complex(0, 2, false)?;
    println!("Complex arithmetic:");
    println!("  ({c1}) + ({c2}) = {}\n", c1.add(&c2));

    let z1 = safe_divide(2, 0);
    let z2 = safe_divide(0, 0);
    println!("Infinity and safe division:");
    println!("  2/0 -> {z1} (is_infinite={})", z1.is_infinite());
    println!("  0/0 -> {z2} (is_undefined={})", z2.is_undefined());
    println!("  inf * 0 -> {}\n", Value::infinity(1, false)?.mul(&Value::from(0)));

    let json = encode(&three)?;
    let back = decode(&json)?;
    println!("JSON round-trip:");
    println!("  original: {three}");
    println!("  json: {json}");
    println!("  decoded: {back}");
    Ok(())
}
