// ABOUTME: Fixed library of pure functions exposed to template authors
// ABOUTME: Covers arithmetic, strings, number parsing, collections and marshalling

use super::error::{FunctionError, FunctionResult as Result};
use crate::value::{self, Record, Scalar, Value};

/// Signature shared by every library function.
pub type TemplateFn = fn(&[Value]) -> Result<Value>;

/// Returned by `atoi` when its input is not an integer.
pub const ATOI_SENTINEL: i64 = i64::MAX;

/// Returned by `atof` when its input is not a number.
pub const ATOF_SENTINEL: f64 = f64::MAX;

/// Upper bound on the elements `seq` builds and the bytes `repeat` produces.
pub const MAX_GENERATED_LEN: usize = 1 << 24;

/// Name-to-function registry, in documentation order.
pub static FUNCTIONS: &[(&str, TemplateFn)] = &[
    // integer math
    ("mod", modulo),
    ("add", add),
    ("sub", sub),
    ("div", div),
    ("abs", abs),
    ("min", min),
    ("max", max),
    // float math
    ("addf", addf),
    ("subf", subf),
    ("divf", divf),
    ("absf", absf),
    ("minf", minf),
    ("maxf", maxf),
    // strings
    ("toUpper", to_upper),
    ("toLower", to_lower),
    ("trim", trim),
    ("trimLeft", trim_left),
    ("trimRight", trim_right),
    ("trimPrefix", trim_prefix),
    ("trimSuffix", trim_suffix),
    ("hasPrefix", has_prefix),
    ("hasSuffix", has_suffix),
    ("replace", replace),
    ("split", split),
    ("join", join),
    ("joinEmpty", join_empty),
    ("contains", contains),
    ("count", count),
    ("lastIndex", last_index),
    ("repeat", repeat),
    // conversions
    ("atoi", atoi),
    ("atof", atof),
    // lists
    ("list", list),
    ("seq", seq),
    ("len", len),
    // maps
    ("dict", dict),
    ("keys", keys),
    // marshallers
    ("json", json),
    ("xml", xml),
];

/// Find a library function by its template name.
pub fn lookup(name: &str) -> Option<TemplateFn> {
    FUNCTIONS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|&(_, func)| func)
}

/// Typed access to the arguments of one call.
struct Args<'a> {
    function: &'static str,
    values: &'a [Value],
}

impl<'a> Args<'a> {
    fn exact(function: &'static str, values: &'a [Value], arity: usize) -> Result<Self> {
        let args = Self { function, values };
        if values.len() != arity {
            return Err(args.invalid(format!(
                "expected {} arguments, got {}",
                arity,
                values.len()
            )));
        }
        Ok(args)
    }

    fn at_least(function: &'static str, values: &'a [Value], min: usize) -> Result<Self> {
        let args = Self { function, values };
        if values.len() < min {
            return Err(args.invalid(format!(
                "expected at least {} arguments, got {}",
                min,
                values.len()
            )));
        }
        Ok(args)
    }

    fn invalid(&self, reason: impl Into<String>) -> FunctionError {
        FunctionError::InvalidArgument {
            function: self.function,
            reason: reason.into(),
        }
    }

    fn mismatch(&self, index: usize, expected: &str) -> FunctionError {
        self.invalid(format!(
            "argument {} must be {}, got {}",
            index + 1,
            expected,
            self.values[index].type_name()
        ))
    }

    fn int(&self, index: usize) -> Result<i64> {
        match &self.values[index] {
            Value::Scalar(Scalar::Int(i)) => Ok(*i),
            Value::Scalar(Scalar::Float(x))
                if x.fract() == 0.0 && *x >= i64::MIN as f64 && *x < i64::MAX as f64 =>
            {
                Ok(*x as i64)
            }
            _ => Err(self.mismatch(index, "an integer")),
        }
    }

    fn float(&self, index: usize) -> Result<f64> {
        match &self.values[index] {
            Value::Scalar(Scalar::Int(i)) => Ok(*i as f64),
            Value::Scalar(Scalar::Float(x)) => Ok(*x),
            // non-finite results come back from the engine as text
            Value::Scalar(Scalar::String(s)) => match s.as_str() {
                "+Inf" => Ok(f64::INFINITY),
                "-Inf" => Ok(f64::NEG_INFINITY),
                "NaN" => Ok(f64::NAN),
                _ => Err(self.mismatch(index, "a number")),
            },
            _ => Err(self.mismatch(index, "a number")),
        }
    }

    fn string(&self, index: usize) -> Result<&'a str> {
        self.values[index]
            .as_str()
            .ok_or_else(|| self.mismatch(index, "a string"))
    }

    fn list(&self, index: usize) -> Result<&'a [Value]> {
        self.values[index]
            .as_list()
            .ok_or_else(|| self.mismatch(index, "a list"))
    }

    fn record(&self, index: usize) -> Result<&'a Record> {
        self.values[index]
            .as_record()
            .ok_or_else(|| self.mismatch(index, "a record"))
    }
}

fn int_binary(function: &'static str, values: &[Value], op: fn(i64, i64) -> i64) -> Result<Value> {
    let args = Args::exact(function, values, 2)?;
    Ok(Value::from(op(args.int(0)?, args.int(1)?)))
}

fn float_binary(function: &'static str, values: &[Value], op: fn(f64, f64) -> f64) -> Result<Value> {
    let args = Args::exact(function, values, 2)?;
    Ok(Value::from(op(args.float(0)?, args.float(1)?)))
}

fn string_unary(function: &'static str, values: &[Value], op: fn(&str) -> String) -> Result<Value> {
    let args = Args::exact(function, values, 1)?;
    Ok(Value::from(op(args.string(0)?)))
}

fn string_binary<T: Into<Value>>(
    function: &'static str,
    values: &[Value],
    op: fn(&str, &str) -> T,
) -> Result<Value> {
    let args = Args::exact(function, values, 2)?;
    Ok(op(args.string(0)?, args.string(1)?).into())
}

fn int_division(function: &'static str, values: &[Value], op: fn(i64, i64) -> i64) -> Result<Value> {
    let args = Args::exact(function, values, 2)?;
    let (a, b) = (args.int(0)?, args.int(1)?);
    if b == 0 {
        return Err(FunctionError::Arithmetic {
            function,
            reason: "integer divide by zero".to_string(),
        });
    }
    Ok(Value::from(op(a, b)))
}

fn modulo(values: &[Value]) -> Result<Value> {
    int_division("mod", values, i64::wrapping_rem)
}

fn add(values: &[Value]) -> Result<Value> {
    int_binary("add", values, i64::wrapping_add)
}

fn sub(values: &[Value]) -> Result<Value> {
    int_binary("sub", values, i64::wrapping_sub)
}

fn div(values: &[Value]) -> Result<Value> {
    int_division("div", values, i64::wrapping_div)
}

fn abs(values: &[Value]) -> Result<Value> {
    let args = Args::exact("abs", values, 1)?;
    Ok(Value::from(args.int(0)?.wrapping_abs()))
}

fn min(values: &[Value]) -> Result<Value> {
    int_binary("min", values, |a, b| if a < b { a } else { b })
}

fn max(values: &[Value]) -> Result<Value> {
    int_binary("max", values, |a, b| if a > b { a } else { b })
}

fn addf(values: &[Value]) -> Result<Value> {
    float_binary("addf", values, |a, b| a + b)
}

fn subf(values: &[Value]) -> Result<Value> {
    float_binary("subf", values, |a, b| a - b)
}

/// Division by zero follows IEEE-754 and yields an infinity or NaN.
fn divf(values: &[Value]) -> Result<Value> {
    float_binary("divf", values, |a, b| a / b)
}

fn absf(values: &[Value]) -> Result<Value> {
    let args = Args::exact("absf", values, 1)?;
    let x = args.float(0)?;
    Ok(Value::from(if x < 0.0 { -x } else { x }))
}

fn minf(values: &[Value]) -> Result<Value> {
    float_binary("minf", values, |a, b| if a < b { a } else { b })
}

fn maxf(values: &[Value]) -> Result<Value> {
    float_binary("maxf", values, |a, b| if a > b { a } else { b })
}

fn to_upper(values: &[Value]) -> Result<Value> {
    string_unary("toUpper", values, str::to_uppercase)
}

fn to_lower(values: &[Value]) -> Result<Value> {
    string_unary("toLower", values, str::to_lowercase)
}

fn trim(values: &[Value]) -> Result<Value> {
    string_unary("trim", values, |s| s.trim().to_string())
}

fn trim_left(values: &[Value]) -> Result<Value> {
    string_binary("trimLeft", values, |s, cutset| {
        s.trim_start_matches(|c: char| cutset.contains(c)).to_string()
    })
}

fn trim_right(values: &[Value]) -> Result<Value> {
    string_binary("trimRight", values, |s, cutset| {
        s.trim_end_matches(|c: char| cutset.contains(c)).to_string()
    })
}

fn trim_prefix(values: &[Value]) -> Result<Value> {
    string_binary("trimPrefix", values, |s, prefix| {
        s.strip_prefix(prefix).unwrap_or(s).to_string()
    })
}

fn trim_suffix(values: &[Value]) -> Result<Value> {
    string_binary("trimSuffix", values, |s, suffix| {
        s.strip_suffix(suffix).unwrap_or(s).to_string()
    })
}

fn has_prefix(values: &[Value]) -> Result<Value> {
    string_binary("hasPrefix", values, |s, prefix| s.starts_with(prefix))
}

fn has_suffix(values: &[Value]) -> Result<Value> {
    string_binary("hasSuffix", values, |s, suffix| s.ends_with(suffix))
}

/// `replace s old new n`: at most `n` replacements, all of them when `n < 0`.
fn replace(values: &[Value]) -> Result<Value> {
    let args = Args::exact("replace", values, 4)?;
    let (s, old, new) = (args.string(0)?, args.string(1)?, args.string(2)?);
    let replaced = match usize::try_from(args.int(3)?) {
        Ok(n) => s.replacen(old, new, n),
        Err(_) => s.replace(old, new),
    };
    Ok(Value::from(replaced))
}

/// An empty separator splits into single characters.
fn split(values: &[Value]) -> Result<Value> {
    let args = Args::exact("split", values, 2)?;
    let (s, sep) = (args.string(0)?, args.string(1)?);
    let parts = if sep.is_empty() {
        s.chars().map(|c| Value::from(c.to_string())).collect()
    } else {
        s.split(sep).map(Value::from).collect()
    };
    Ok(Value::List(parts))
}

fn join(values: &[Value]) -> Result<Value> {
    let args = Args::exact("join", values, 2)?;
    let sep = args.string(1)?;
    let parts = args
        .list(0)?
        .iter()
        .map(|item| match item {
            Value::Scalar(scalar) => Ok(scalar.to_string()),
            other => Err(args.invalid(format!(
                "list elements must be scalars, got {}",
                other.type_name()
            ))),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Value::from(parts.join(sep)))
}

/// `joinEmpty sep a b ...` joins the non-blank scalars. Null counts as blank.
fn join_empty(values: &[Value]) -> Result<Value> {
    let args = Args::at_least("joinEmpty", values, 1)?;
    let sep = args.string(0)?;
    let mut kept = Vec::new();
    for item in &values[1..] {
        match item {
            Value::Scalar(scalar) => {
                let text = scalar.to_string();
                if !text.trim().is_empty() {
                    kept.push(text);
                }
            }
            other => {
                return Err(args.invalid(format!(
                    "values must be scalars, got {}",
                    other.type_name()
                )))
            }
        }
    }
    Ok(Value::from(kept.join(sep)))
}

fn contains(values: &[Value]) -> Result<Value> {
    string_binary("contains", values, |s, substr| s.contains(substr))
}

/// Non-overlapping occurrences; an empty substring counts characters plus one.
fn count(values: &[Value]) -> Result<Value> {
    string_binary("count", values, |s, substr| {
        let n = if substr.is_empty() {
            s.chars().count() + 1
        } else {
            s.matches(substr).count()
        };
        n as i64
    })
}

/// Byte offset of the last occurrence, or -1.
fn last_index(values: &[Value]) -> Result<Value> {
    string_binary("lastIndex", values, |s, substr| {
        s.rfind(substr).map_or(-1, |i| i as i64)
    })
}

fn repeat(values: &[Value]) -> Result<Value> {
    let args = Args::exact("repeat", values, 2)?;
    let s = args.string(0)?;
    let n = usize::try_from(args.int(1)?).map_err(|_| args.invalid("negative repeat count"))?;
    match s.len().checked_mul(n) {
        Some(size) if size <= MAX_GENERATED_LEN => {}
        _ => return Err(args.invalid("repeat output too large")),
    }
    Ok(Value::from(s.repeat(n)))
}

/// Unparsable text yields `ATOI_SENTINEL` instead of failing the render.
fn atoi(values: &[Value]) -> Result<Value> {
    let args = Args::exact("atoi", values, 1)?;
    match &values[0] {
        Value::Scalar(Scalar::String(s)) => {
            Ok(Value::from(s.parse::<i64>().unwrap_or(ATOI_SENTINEL)))
        }
        Value::Scalar(Scalar::Int(i)) => Ok(Value::from(*i)),
        _ => Err(args.mismatch(0, "a string")),
    }
}

/// Unparsable text yields `ATOF_SENTINEL` instead of failing the render.
fn atof(values: &[Value]) -> Result<Value> {
    let args = Args::exact("atof", values, 1)?;
    match &values[0] {
        Value::Scalar(Scalar::String(s)) => Ok(Value::from(parse_float(s))),
        Value::Scalar(Scalar::Int(_) | Scalar::Float(_)) => Ok(Value::from(args.float(0)?)),
        _ => Err(args.mismatch(0, "a string")),
    }
}

/// Out-of-range input such as `1e400` counts as unparsable; only the literal
/// spellings of infinity and NaN produce non-finite values.
fn parse_float(s: &str) -> f64 {
    match s.parse::<f64>() {
        Ok(x) if x.is_finite() => x,
        Ok(x) => {
            let word = s.trim_start_matches(['+', '-']).to_ascii_lowercase();
            if matches!(word.as_str(), "inf" | "infinity" | "nan") {
                x
            } else {
                ATOF_SENTINEL
            }
        }
        Err(_) => ATOF_SENTINEL,
    }
}

fn list(values: &[Value]) -> Result<Value> {
    Ok(Value::List(values.to_vec()))
}

/// Inclusive ascending range; empty when `start > end`.
fn seq(values: &[Value]) -> Result<Value> {
    let args = Args::exact("seq", values, 2)?;
    let (start, end) = (args.int(0)?, args.int(1)?);
    if start > end {
        return Ok(Value::List(Vec::new()));
    }
    match end.checked_sub(start).and_then(|span| usize::try_from(span).ok()) {
        Some(span) if span < MAX_GENERATED_LEN => {}
        _ => return Err(args.invalid("range too large")),
    }
    Ok(Value::List((start..=end).map(Value::from).collect()))
}

fn len(values: &[Value]) -> Result<Value> {
    let args = Args::exact("len", values, 1)?;
    Ok(Value::from(args.list(0)?.len() as i64))
}

/// `dict k1 v1 k2 v2 ...`. Keys must be strings and every key needs a value.
fn dict(values: &[Value]) -> Result<Value> {
    let args = Args {
        function: "dict",
        values,
    };
    if values.len() % 2 != 0 {
        return Err(args.invalid(format!(
            "odd number of arguments ({}): every key needs a value",
            values.len()
        )));
    }

    let mut fields = Record::with_capacity(values.len() / 2);
    for (index, pair) in values.chunks(2).enumerate() {
        let key = args
            .string(index * 2)
            .map_err(|_| args.invalid("dict keys must be strings"))?;
        fields.insert(key.to_string(), pair[1].clone());
    }
    Ok(Value::Record(fields))
}

fn keys(values: &[Value]) -> Result<Value> {
    let args = Args::exact("keys", values, 1)?;
    let names = args
        .record(0)?
        .keys()
        .map(|key| Value::from(key.as_str()))
        .collect();
    Ok(Value::List(names))
}

/// Marshal failures are rendered inline rather than aborting the template.
fn json(values: &[Value]) -> Result<Value> {
    Args::exact("json", values, 1)?;
    let text = value::to_json_string(&values[0])
        .unwrap_or_else(|e| format!("error marshalling json: {}", e));
    Ok(Value::from(text))
}

fn xml(values: &[Value]) -> Result<Value> {
    Args::exact("xml", values, 1)?;
    let text = value::to_xml_string(&values[0])
        .unwrap_or_else(|e| format!("error marshalling xml: {}", e));
    Ok(Value::from(text))
}
