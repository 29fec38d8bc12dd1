//! Local names used inside a generated method body
//!
//! Every name the synthesizer introduces is checked against the method's
//! parameter names (and against each other), so generated locals never
//! shadow a parameter. Names are a pure function of the parameter list.

use rustc_hash::FxHashSet;

use crate::model::MethodDescriptor;

/// Resolved local names for one method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodLocals {
    /// The per-call context variable
    pub context: String,
    /// Holds the hook's result for non-void shapes
    pub result: String,
    /// Parameter of the inner-call closure
    pub closure_parameter: String,
    /// Holds the underlying call's result inside the closure
    pub inner_result: String,
    /// Context field referencing the underlying implementation
    pub underlying_field: String,
    /// Temporary per parameter, `None` for by-value parameters
    pub temporaries: Vec<Option<String>>,
}

impl MethodLocals {
    /// Resolve names for `method`
    pub fn resolve(method: &MethodDescriptor) -> Self {
        let mut taken: FxHashSet<String> =
            method.parameters.iter().map(|p| p.name.clone()).collect();

        let context = claim("methodContext", &mut taken);
        let result = claim("interceptorInvocationResult", &mut taken);
        let closure_parameter = claim("context", &mut taken);
        let inner_result = claim("localResult", &mut taken);
        let underlying_field = claim("underlyingImplementation", &mut taken);

        let temporaries = method
            .parameters
            .iter()
            .enumerate()
            .map(|(i, p)| {
                p.mode
                    .needs_temporary()
                    .then(|| {
                        let name = p.name.trim_start_matches('@');
                        claim(&format!("temp_{}_{}", i, name), &mut taken)
                    })
            })
            .collect();

        Self {
            context,
            result,
            closure_parameter,
            inner_result,
            underlying_field,
            temporaries,
        }
    }

    /// Temporary for the parameter at `index`
    pub fn temporary(&self, index: usize) -> Option<&str> {
        self.temporaries.get(index).and_then(|t| t.as_deref())
    }
}

fn claim(base: &str, taken: &mut FxHashSet<String>) -> String {
    let mut candidate = base.to_string();
    let mut n = 1;
    while taken.contains(&candidate) {
        candidate = format!("{}_{}", base, n);
        n += 1;
    }
    taken.insert(candidate.clone());
    candidate
}
