use crate::core::averager::{average_stat_maps, RoundingMode};
use crate::core::compat::StatProfile;
use crate::core::effectiveness::{resolve_with, ReconcileOptions};
use crate::core::fusion::{fuse_with, FusionOptions};
use crate::data::record::AttributeRecord;
use crate::data::stats::BaseStats;
use crate::data::type_chart::TypeChart;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use wasm_bindgen::prelude::*;

static TYPE_CHART: Lazy<TypeChart> = Lazy::new(TypeChart::new);

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EngineOptionsWire {
    #[serde(default)]
    rounding: Option<RoundingMode>,
    #[serde(default)]
    immunity_over_resist: Option<bool>,
    #[serde(default)]
    immunity_over_weakness: Option<bool>,
}

impl EngineOptionsWire {
    fn parse(options: JsValue) -> Result<Self, JsValue> {
        if options.is_undefined() || options.is_null() {
            Ok(Self::default())
        } else {
            serde_wasm_bindgen::from_value(options).map_err(js_err)
        }
    }

    fn rounding(&self) -> RoundingMode {
        self.rounding.unwrap_or_default()
    }

    fn reconcile(&self) -> ReconcileOptions {
        let defaults = ReconcileOptions::default();
        ReconcileOptions {
            immunity_over_resist: self.immunity_over_resist.unwrap_or(defaults.immunity_over_resist),
            immunity_over_weakness: self
                .immunity_over_weakness
                .unwrap_or(defaults.immunity_over_weakness),
        }
    }
}

fn js_err(message: impl ToString) -> JsValue {
    JsValue::from_str(&message.to_string())
}

fn parse_record(value: JsValue) -> Result<AttributeRecord, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(js_err)
}

// Maps become plain objects rather than JS `Map`s.
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(js_err)
}

#[wasm_bindgen(js_name = fuse)]
pub fn fuse_wasm(primary: JsValue, secondary: JsValue, options: JsValue) -> Result<JsValue, JsValue> {
    let options = EngineOptionsWire::parse(options)?;
    let primary = parse_record(primary)?;
    let secondary = parse_record(secondary)?;
    let fused = fuse_with(
        &primary,
        &secondary,
        FusionOptions {
            rounding: options.rounding(),
        },
    );
    to_js(&fused)
}

#[wasm_bindgen(js_name = averageStats)]
pub fn average_stats_wasm(primary: JsValue, secondary: JsValue, options: JsValue) -> Result<JsValue, JsValue> {
    let options = EngineOptionsWire::parse(options)?;
    let primary: HashMap<String, u32> = serde_wasm_bindgen::from_value(primary).map_err(js_err)?;
    let secondary: HashMap<String, u32> = serde_wasm_bindgen::from_value(secondary).map_err(js_err)?;
    let averaged = average_stat_maps(&primary, &secondary, options.rounding()).map_err(js_err)?;
    to_js(&averaged)
}

#[wasm_bindgen(js_name = resolveTypes)]
pub fn resolve_types_wasm(types: JsValue, options: JsValue) -> Result<JsValue, JsValue> {
    let options = EngineOptionsWire::parse(options)?;
    let types: Vec<String> = serde_wasm_bindgen::from_value(types).map_err(js_err)?;
    let effectiveness = resolve_with(&TYPE_CHART, &types, options.reconcile()).map_err(js_err)?;
    to_js(&effectiveness)
}

#[wasm_bindgen(js_name = typeMultiplier)]
pub fn type_multiplier_wasm(attack_type: String, types: JsValue) -> Result<f32, JsValue> {
    let types: Vec<String> = serde_wasm_bindgen::from_value(types).map_err(js_err)?;
    TYPE_CHART.multiplier(&attack_type, &types).map_err(js_err)
}

#[wasm_bindgen(js_name = statProfile)]
pub fn stat_profile_wasm(stats: JsValue) -> Result<JsValue, JsValue> {
    let stats: BaseStats = serde_wasm_bindgen::from_value(stats).map_err(js_err)?;
    to_js(&StatProfile::of(&stats))
}

#[wasm_bindgen(js_name = matchesProfile)]
pub fn matches_profile_wasm(reference: JsValue, candidate: JsValue, margin: u32) -> Result<bool, JsValue> {
    let reference: BaseStats = serde_wasm_bindgen::from_value(reference).map_err(js_err)?;
    let candidate: BaseStats = serde_wasm_bindgen::from_value(candidate).map_err(js_err)?;
    Ok(StatProfile::of(&reference).accepts(&StatProfile::of(&candidate), margin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::wasm_bindgen_test;

    fn stats(values: [u32; 6]) -> JsValue {
        let keys = ["HP", "Attack", "Defense", "SpAtk", "SpDef", "Speed"];
        let map: HashMap<&str, u32> = keys.into_iter().zip(values).collect();
        to_js(&map).unwrap()
    }

    #[wasm_bindgen_test]
    fn average_stats_returns_a_plain_object() {
        let averaged = average_stats_wasm(
            stats([78, 84, 78, 109, 85, 100]),
            stats([75, 90, 90, 70, 90, 60]),
            JsValue::UNDEFINED,
        )
        .unwrap();
        assert!(!averaged.is_instance_of::<js_sys::Map>());
        let hp = js_sys::Reflect::get(&averaged, &JsValue::from_str("HP")).unwrap();
        assert_eq!(hp.as_f64(), Some(77.0));
    }
}
