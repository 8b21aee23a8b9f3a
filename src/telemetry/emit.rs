use std::io::{self, Write};

use anyhow::Result;
use serde::Serialize;
use serde_json::json;

#[derive(Serialize)]
pub struct Meta {
    pub duration_ms: u128,
}

pub fn print_plan<T: Serialize>(op: &str, plan: &T) -> Result<()> {
    let env = json!({ "op": op, "apply": false, "plan": plan });
    let mut out = io::stdout();
    serde_json::to_writer(&mut out, &env)?;
    writeln!(&mut out)?;
    Ok(())
}

pub fn print_result<T: Serialize>(op: &str, result: &T, meta: Meta) -> Result<()> {
    let env = json!({ "op": op, "apply": true, "result": result, "meta": meta });
    let mut out = io::stdout();
    serde_json::to_writer(&mut out, &env)?;
    writeln!(&mut out)?;
    Ok(())
}
