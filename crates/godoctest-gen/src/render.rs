// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Code rendering.
//!
//! A two-level template: `test_file` emits the header, package, imports and
//! the equality helper, then includes `single_test` once per spec.

use minijinja::{AutoEscape, Environment};
use serde::Serialize;

use crate::assemble::TestSpec;
use crate::literal::POINTER_TABLE;
use crate::GenError;

const TEST_FILE: &str = r#"// Code generated by godoctest from {{ source_name }}. DO NOT EDIT.

package {{ package }}

import (
	"bytes"
	"reflect"
	"testing"
)

// {{ helper }} reports whether two values are equal. Byte slices are
// compared by content, everything else with reflect.DeepEqual.
func {{ helper }}(expected, actual interface{}) bool {
	if expected == nil || actual == nil {
		return expected == actual
	}
	if exp, ok := expected.([]byte); ok {
		act, ok := actual.([]byte)
		if !ok {
			return false
		} else if exp == nil || act == nil {
			return exp == nil && act == nil
		}
		return bytes.Equal(exp, act)
	}
	return reflect.DeepEqual(expected, actual)
}
{% for spec in specs %}

{% include "single_test" %}
{% endfor %}
"#;

const SINGLE_TEST: &str = r#"func {{ spec.test_name }}(t *testing.T) {
{% if spec.ptr_rows %}
	{{ ptr_table }} := []struct {
{% for field in spec.ptr_fields %}
		{{ field }}
{% endfor %}
	}{
{% for row in spec.ptr_rows %}
		{{ row }},
{% endfor %}
	}
{% endif %}
	tests := []struct {
{% for field in spec.fields %}
		{{ field }}
{% endfor %}
	}{
{% for row in spec.rows %}
		{{ row }},
{% endfor %}
	}
{% if spec.results %}
	for i, test := range tests {
		{{ spec.results|join(", ") }} := {{ spec.func_name }}({{ spec.args }})
{% for result in spec.results %}
		if !{{ helper }}(test.e{{ loop.index0 }}, {{ result }}) {
			t.Errorf("case %d: {{ spec.func_name }} result {{ loop.index0 }}: expected %#v, got %#v", i, test.e{{ loop.index0 }}, {{ result }})
		}
{% endfor %}
	}
{% elif spec.args %}
	for _, test := range tests {
		{{ spec.func_name }}({{ spec.args }})
	}
{% else %}
	for range tests {
		{{ spec.func_name }}()
	}
{% endif %}
}
"#;

#[derive(Serialize)]
struct FileContext<'a> {
    source_name: &'a str,
    package: &'a str,
    helper: String,
    ptr_table: &'static str,
    specs: Vec<SpecContext>,
}

/// A `TestSpec` pre-formatted into Go fragments.
#[derive(Serialize)]
struct SpecContext {
    test_name: String,
    func_name: String,
    fields: Vec<String>,
    rows: Vec<String>,
    ptr_fields: Vec<String>,
    ptr_rows: Vec<String>,
    args: String,
    results: Vec<String>,
}

impl SpecContext {
    fn new(spec: &TestSpec) -> Result<Self, GenError> {
        let sig = &spec.signature;
        let width = sig.field_count();

        if spec.rows.len() != spec.pointer_rows.len() {
            return Err(GenError::RenderFailure(format!(
                "`{}` has {} rows but {} pointer-storage rows",
                spec.func_name,
                spec.rows.len(),
                spec.pointer_rows.len()
            )));
        }
        if let Some((i, row)) = spec.rows.iter().enumerate().find(|(_, row)| row.len() != width) {
            return Err(GenError::RenderFailure(format!(
                "`{}` case {} has {} fields, expected {}",
                spec.func_name,
                i,
                row.len(),
                width
            )));
        }

        let pointer_slots: Vec<_> = sig.slots().filter(|s| s.descriptor.is_pointer()).collect();
        for entry in spec.pointer_rows.iter().flatten() {
            if !pointer_slots.iter().any(|s| s.field == entry.field) {
                return Err(GenError::RenderFailure(format!(
                    "`{}` stores a pointer value for `{}`, which is not a pointer field",
                    spec.func_name, entry.field
                )));
            }
        }

        let (ptr_fields, ptr_rows) = if spec.has_pointer_storage() {
            let fields = pointer_slots
                .iter()
                .map(|s| format!("{} {}", s.field, s.descriptor.name()))
                .collect();
            let rows = spec
                .pointer_rows
                .iter()
                .map(|row| {
                    let entries: Vec<_> =
                        row.iter().map(|e| format!("{}: {}", e.field, e.value)).collect();
                    format!("{{{}}}", entries.join(", "))
                })
                .collect();
            (fields, rows)
        } else {
            (Vec::new(), Vec::new())
        };

        Ok(Self {
            test_name: spec.test_name(),
            func_name: spec.func_name.clone(),
            fields: sig.slots().map(|s| s.descriptor.field(&s.field)).collect(),
            rows: spec.rows.iter().map(|row| format!("{{{}}}", row.join(", "))).collect(),
            ptr_fields,
            ptr_rows,
            args: sig
                .params
                .iter()
                .map(|s| s.descriptor.arg(&s.field))
                .collect::<Vec<_>>()
                .join(", "),
            results: (0..sig.results.len()).map(|i| format!("r{}", i)).collect(),
        })
    }
}

fn environment() -> Result<Environment<'static>, GenError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.add_template("test_file", TEST_FILE)?;
    env.add_template("single_test", SINGLE_TEST)?;
    Ok(env)
}

/// Name of the per-file equality helper. Each generated file gets its own
/// so several of them can share a package.
pub fn helper_name(source_stem: &str) -> String {
    let sanitized: String = source_stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("gdtObjectsAreEqual_{}", sanitized)
}

/// Render the generated test file for one source file.
pub fn render_file(source_name: &str, package: &str, specs: &[TestSpec]) -> Result<String, GenError> {
    let stem = source_name.strip_suffix(".go").unwrap_or(source_name);
    let context = FileContext {
        source_name,
        package,
        helper: helper_name(stem),
        ptr_table: POINTER_TABLE,
        specs: specs.iter().map(SpecContext::new).collect::<Result<Vec<_>, GenError>>()?,
    };

    let env = environment()?;
    let text = env.get_template("test_file")?.render(&context)?;
    Ok(text)
}
