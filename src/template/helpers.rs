// ABOUTME: Handlebars helper adapter for the template function library
// ABOUTME: Converts helper parameters into values and results back into engine data

use handlebars::{Context, Handlebars, Helper, HelperDef, RenderContext, RenderError, ScopedJson};
use tracing::debug;

use super::functions::{TemplateFn, FUNCTIONS};
use crate::value::Value;

/// One library function exposed as a Handlebars helper. Usable both as
/// `{{name args}}` and as a sub-expression `(name args)`.
#[derive(Clone, Copy)]
pub struct FunctionHelper {
    func: TemplateFn,
}

impl FunctionHelper {
    pub fn new(func: TemplateFn) -> Self {
        Self { func }
    }
}

impl HelperDef for FunctionHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'reg, 'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'reg, 'rc>, RenderError> {
        let args: Vec<Value> = h
            .params()
            .iter()
            .map(|param| Value::from(param.value().clone()))
            .collect();

        let result = (self.func)(&args).map_err(|e| RenderError::new(e.to_string()))?;
        Ok(ScopedJson::Derived(result.to_json()))
    }
}

/// Register the whole function library, replacing built-ins of the same name.
pub fn register_helpers(handlebars: &mut Handlebars) {
    for &(name, func) in FUNCTIONS {
        handlebars.register_helper(name, Box::new(FunctionHelper::new(func)));
    }
    debug!("Registered {} template functions", FUNCTIONS.len());
}
