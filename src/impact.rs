// src/impact.rs
use serde::Serialize;
use strum_macros::{Display, EnumString};
use thiserror::Error;

const PERCENTAGE_UNIT: &str = "percentage";

#[derive(Debug, Error, PartialEq)]
pub enum ImpactError {
    #[error("Nieprawidłowa wartość pola '{field}': {value}")]
    InvalidInput { field: &'static str, value: f64 },
}

/// Materiał wchodzący w skład kategorii produktu.
///
/// Współczynniki oszczędności są liczone na kilogram danego materiału.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialComponent {
    pub material_type: String,
    pub quantity: f64,
    pub unit: String,
    pub estimated_co2_savings_kg: f64,
    pub estimated_water_savings_lt: f64,
}

impl MaterialComponent {
    // Każda inna jednostka to waga bezwzględna w kg
    pub fn is_percentage(&self) -> bool {
        self.unit == PERCENTAGE_UNIT
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialBreakdown {
    #[serde(rename = "materialType")]
    pub material_type: String,
    pub percentage: f64,
    #[serde(rename = "weightKG")]
    pub weight_kg: f64,
    #[serde(rename = "co2SavingsKG")]
    pub co2_savings_kg: f64,
    #[serde(rename = "waterSavingsLT")]
    pub water_savings_lt: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactEstimate {
    #[serde(rename = "totalCo2SavingsKG")]
    pub total_co2_savings_kg: f64,
    #[serde(rename = "totalWaterSavingsLT")]
    pub total_water_savings_lt: f64,
    #[serde(rename = "materialBreakdown")]
    pub material_breakdown: Vec<MaterialBreakdown>,
}

impl ImpactEstimate {
    pub fn empty() -> Self {
        ImpactEstimate {
            total_co2_savings_kg: 0.0,
            total_water_savings_lt: 0.0,
            material_breakdown: Vec::new(),
        }
    }
}

/// Szacuje oszczędności CO2 i wody dla kategorii produktu na podstawie
/// składu materiałowego i średniej wagi produktu.
///
/// Sumy są zaokrąglane do 2 miejsc po przecinku, wartości w rozbiciu na
/// materiały nie. Kolejność rozbicia odpowiada kolejności wejścia.
///
/// Ujemne lub nieskończone wartości wejściowe kończą się błędem. Średnia waga
/// równa 0 jest dozwolona: materiały procentowe ważą wtedy 0 kg, a udział
/// procentowy materiałów o wadze bezwzględnej wynosi 0.
pub fn calculate_category_impact(
    materials: &[MaterialComponent],
    average_weight_kg: f64,
) -> Result<ImpactEstimate, ImpactError> {
    if materials.is_empty() {
        return Ok(ImpactEstimate::empty());
    }

    ensure_non_negative("averageWeight", average_weight_kg)?;

    let mut total_co2_savings_kg = 0.0;
    let mut total_water_savings_lt = 0.0;
    let mut material_breakdown = Vec::with_capacity(materials.len());

    for material in materials {
        ensure_non_negative("quantity", material.quantity)?;
        ensure_non_negative("estimatedCo2SavingsKG", material.estimated_co2_savings_kg)?;
        ensure_non_negative(
            "estimatedWaterSavingsLT",
            material.estimated_water_savings_lt,
        )?;

        let (weight_kg, percentage) = if material.is_percentage() {
            (average_weight_kg * material.quantity / 100.0, material.quantity)
        } else if average_weight_kg > 0.0 {
            (
                material.quantity,
                material.quantity / average_weight_kg * 100.0,
            )
        } else {
            (material.quantity, 0.0)
        };

        let co2_savings_kg = weight_kg * material.estimated_co2_savings_kg;
        let water_savings_lt = weight_kg * material.estimated_water_savings_lt;

        total_co2_savings_kg += co2_savings_kg;
        total_water_savings_lt += water_savings_lt;

        material_breakdown.push(MaterialBreakdown {
            material_type: material.material_type.clone(),
            percentage,
            weight_kg,
            co2_savings_kg,
            water_savings_lt,
        });
    }

    Ok(ImpactEstimate {
        total_co2_savings_kg: round_to_cents(total_co2_savings_kg),
        total_water_savings_lt: round_to_cents(total_water_savings_lt),
        material_breakdown,
    })
}

fn ensure_non_negative(field: &'static str, value: f64) -> Result<(), ImpactError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ImpactError::InvalidInput { field, value });
    }
    Ok(())
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rodzaj komunikatu o wpływie na środowisko, tak jak występuje w ścieżce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ImpactKind {
    #[strum(serialize = "co2")]
    Co2,
    #[strum(serialize = "water")]
    Water,
}

impl ImpactKind {
    pub fn table(&self) -> &'static str {
        match self {
            ImpactKind::Co2 => "co2_impact_messages",
            ImpactKind::Water => "water_impact_messages",
        }
    }
}

/// Wszystko, co ma dolną granicę przedziału, może brać udział w wyborze
/// najbliższego komunikatu.
pub trait RangeBound {
    fn lower_bound(&self) -> f64;
}

/// Wybiera komunikat najbliższy wartości, gdy żaden przedział jej nie zawiera.
///
/// `lower` to przedział o największym `min <= value`, `higher` to przedział o
/// najmniejszym `min > value`. Przy równej odległości wygrywa `lower`.
pub fn closest_impact_message<M: RangeBound>(
    value: f64,
    lower: Option<M>,
    higher: Option<M>,
) -> Option<M> {
    match (lower, higher) {
        (Some(lower), Some(higher)) => {
            let lower_distance = (value - lower.lower_bound()).abs();
            let higher_distance = (value - higher.lower_bound()).abs();
            if lower_distance <= higher_distance {
                Some(lower)
            } else {
                Some(higher)
            }
        }
        (lower, higher) => lower.or(higher),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn material(material_type: &str, quantity: f64, unit: &str, co2: f64, water: f64) -> MaterialComponent {
        MaterialComponent {
            material_type: material_type.to_string(),
            quantity,
            unit: unit.to_string(),
            estimated_co2_savings_kg: co2,
            estimated_water_savings_lt: water,
        }
    }

    #[test]
    fn empty_materials_give_zero_estimate() {
        assert_eq!(calculate_category_impact(&[], 5.0), Ok(ImpactEstimate::empty()));
        // Brak materiałów jest przypadkiem końcowym nawet przy złej wadze
        assert_eq!(calculate_category_impact(&[], -1.0), Ok(ImpactEstimate::empty()));
    }

    #[test]
    fn percentage_material_uses_average_weight() {
        let materials = [material("cotton", 50.0, "percentage", 2.0, 100.0)];
        let estimate = calculate_category_impact(&materials, 2.0).unwrap();

        assert_eq!(estimate.total_co2_savings_kg, 2.0);
        assert_eq!(estimate.total_water_savings_lt, 100.0);
        assert_eq!(
            estimate.material_breakdown,
            vec![MaterialBreakdown {
                material_type: "cotton".to_string(),
                percentage: 50.0,
                weight_kg: 1.0,
                co2_savings_kg: 2.0,
                water_savings_lt: 100.0,
            }]
        );
    }

    #[test]
    fn absolute_material_reports_share_of_average_weight() {
        let materials = [material("leather", 0.3, "kg", 5.0, 10.0)];
        let estimate = calculate_category_impact(&materials, 2.0).unwrap();
        let breakdown = &estimate.material_breakdown[0];

        assert_eq!(breakdown.weight_kg, 0.3);
        assert!((breakdown.co2_savings_kg - 1.5).abs() < 1e-9);
        assert!((breakdown.percentage - 15.0).abs() < 1e-9);
        assert_eq!(estimate.total_co2_savings_kg, 1.5);
        assert_eq!(estimate.total_water_savings_lt, 3.0);
    }

    #[test]
    fn totals_are_rounded_but_breakdown_is_not() {
        let materials = [
            material("polyester", 1.23456, "kg", 1.0, 0.0),
            material("cotton", 0.0, "percentage", 3.0, 3.0),
        ];
        let estimate = calculate_category_impact(&materials, 4.0).unwrap();

        assert_eq!(estimate.total_co2_savings_kg, 1.23);
        assert_eq!(estimate.material_breakdown[0].co2_savings_kg, 1.23456);
    }

    #[test]
    fn breakdown_keeps_input_order_and_sums_to_totals() {
        let materials = [
            material("wool", 30.0, "percentage", 4.0, 50.0),
            material("cotton", 70.0, "percentage", 2.0, 100.0),
        ];
        let estimate = calculate_category_impact(&materials, 1.0).unwrap();

        let types: Vec<&str> = estimate
            .material_breakdown
            .iter()
            .map(|b| b.material_type.as_str())
            .collect();
        assert_eq!(types, vec!["wool", "cotton"]);

        let co2_sum: f64 = estimate.material_breakdown.iter().map(|b| b.co2_savings_kg).sum();
        let water_sum: f64 = estimate.material_breakdown.iter().map(|b| b.water_savings_lt).sum();
        assert_eq!(estimate.total_co2_savings_kg, round_to_cents(co2_sum));
        assert_eq!(estimate.total_water_savings_lt, round_to_cents(water_sum));
        assert_eq!(estimate.total_co2_savings_kg, 2.6);
        assert_eq!(estimate.total_water_savings_lt, 85.0);
    }

    #[test]
    fn zero_average_weight_does_not_divide_by_zero() {
        let materials = [
            material("cotton", 60.0, "percentage", 2.0, 100.0),
            material("metal", 0.5, "kg", 1.0, 1.0),
        ];
        let estimate = calculate_category_impact(&materials, 0.0).unwrap();

        assert_eq!(estimate.material_breakdown[0].weight_kg, 0.0);
        assert_eq!(estimate.material_breakdown[1].percentage, 0.0);
        assert_eq!(estimate.total_co2_savings_kg, 0.5);
        assert!(estimate.material_breakdown.iter().all(|b| b.percentage.is_finite()));
    }

    #[test]
    fn negative_inputs_are_rejected() {
        let materials = [material("cotton", 50.0, "percentage", 2.0, 100.0)];
        assert_eq!(
            calculate_category_impact(&materials, -2.0),
            Err(ImpactError::InvalidInput {
                field: "averageWeight",
                value: -2.0
            })
        );

        let materials = [material("cotton", -1.0, "kg", 2.0, 100.0)];
        assert!(matches!(
            calculate_category_impact(&materials, 2.0),
            Err(ImpactError::InvalidInput { field: "quantity", .. })
        ));

        let materials = [material("cotton", 1.0, "kg", f64::NAN, 100.0)];
        assert!(calculate_category_impact(&materials, 2.0).is_err());
    }

    #[test]
    fn estimate_serializes_with_contract_field_names() {
        let materials = [material("cotton", 50.0, "percentage", 2.0, 100.0)];
        let estimate = calculate_category_impact(&materials, 2.0).unwrap();
        let json = serde_json::to_value(&estimate).unwrap();

        assert_eq!(json["totalCo2SavingsKG"], 2.0);
        assert_eq!(json["totalWaterSavingsLT"], 100.0);
        assert_eq!(json["materialBreakdown"][0]["weightKG"], 1.0);
        assert_eq!(json["materialBreakdown"][0]["materialType"], "cotton");
    }

    #[derive(Debug, PartialEq)]
    struct Range(f64);

    impl RangeBound for Range {
        fn lower_bound(&self) -> f64 {
            self.0
        }
    }

    #[test]
    fn closest_message_prefers_nearest_min() {
        assert_eq!(
            closest_impact_message(12.0, Some(Range(5.0)), Some(Range(15.0))),
            Some(Range(15.0))
        );
        assert_eq!(
            closest_impact_message(8.0, Some(Range(5.0)), Some(Range(15.0))),
            Some(Range(5.0))
        );
    }

    #[test]
    fn closest_message_tie_goes_to_lower() {
        assert_eq!(
            closest_impact_message(10.0, Some(Range(5.0)), Some(Range(15.0))),
            Some(Range(5.0))
        );
    }

    #[test]
    fn closest_message_with_one_side_missing() {
        assert_eq!(closest_impact_message(1.0, None, Some(Range(3.0))), Some(Range(3.0)));
        assert_eq!(closest_impact_message(9.0, Some(Range(3.0)), None), Some(Range(3.0)));
        assert_eq!(closest_impact_message::<Range>(9.0, None, None), None);
    }

    #[test]
    fn impact_kind_parses_and_names_its_table() {
        assert_eq!(ImpactKind::from_str("CO2"), Ok(ImpactKind::Co2));
        assert_eq!(ImpactKind::from_str("water"), Ok(ImpactKind::Water));
        assert!(ImpactKind::from_str("soil").is_err());
        assert_eq!(ImpactKind::Water.to_string(), "water");
        assert_eq!(ImpactKind::Water.table(), "water_impact_messages");
        // Nazwa tabeli nie jest akceptowaną nazwą rodzaju
        assert!(ImpactKind::from_str("co2_impact_messages").is_err());
        assert!(ImpactKind::from_str("water_impact_messages").is_err());
    }
}
