//! Company car benefit (förmånsbil) comparison.
//!
//! Compares an employee's monthly net salary with and without a company car.
//! The taxable benefit value (förmånsvärde) is offset under one of two
//! deduction models:
//!
//! | Model | Gross salary | Taxable benefit | Paid privately |
//! |-------|--------------|-----------------|----------------|
//! | [`DeductionModel::Gross`] (bruttolöneavdrag) | reduced by the deduction | full value | nothing |
//! | [`DeductionModel::Net`] (nettolöneavdrag) | unchanged | value minus the deduction | the deduction, from net pay |
//!
//! Withholding for both scenarios comes from the same tax table column, so
//! the comparison reflects the table's bracket steps.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{non_negative, percent_of};
use crate::calculations::tax_table::{TaxColumn, TaxTableError, lookup_withholding};
use crate::models::TaxTableEntry;

/// How the employee pays towards the car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeductionModel {
    /// Bruttolöneavdrag: the payment is taken from gross salary.
    #[serde(alias = "brutto")]
    Gross,
    /// Nettolöneavdrag: the payment is taken from net salary and lowers the
    /// taxable benefit value.
    #[serde(alias = "netto")]
    Net,
}

/// Monthly inputs for the company car comparison. Amounts are SEK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarBenefitInput {
    pub gross_salary: Decimal,
    /// Monthly taxable benefit value (förmånsvärde).
    pub benefit_value: Decimal,
    pub deduction_model: DeductionModel,
    /// Gross-salary deduction under [`DeductionModel::Gross`].
    pub gross_deduction: Decimal,
    /// Net-salary deduction under [`DeductionModel::Net`].
    pub net_deduction: Decimal,
    /// Monthly cost of an equivalent private lease, 0 when not compared.
    pub private_leasing: Decimal,
    /// Monthly cost of an equivalent business lease, 0 when not compared.
    pub business_leasing: Decimal,
    /// Employer contribution rate, percent.
    pub employer_contribution: Decimal,
}

/// Outcome of the company car comparison, monthly SEK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarBenefitResult {
    // Without car
    pub net_salary_without_car: Decimal,
    pub tax_without_car: Decimal,

    // With car
    pub net_salary_with_car: Decimal,
    pub tax_with_car: Decimal,
    pub effective_benefit_value: Decimal,

    // Comparison
    pub monthly_difference: Decimal,
    pub compared_to_private_leasing: Decimal,
    pub compared_to_business_leasing: Decimal,

    // Employer costs
    pub employer_cost_benefit: Decimal,
    pub employer_cost_total: Decimal,

    // Details
    pub adjusted_gross_salary: Decimal,
    pub taxable_benefit: Decimal,
    pub private_payment: Decimal,
}

/// Compares net salary with and without a company car.
///
/// # Errors
///
/// Returns [`TaxTableError::EmptyTable`] when `tax_table` has no rows.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use skatt_core::TaxTableEntry;
/// use skatt_core::calculations::{
///     CarBenefitInput, DeductionModel, TaxColumn, calculate_car_benefit,
/// };
///
/// let table = vec![TaxTableEntry {
///     year: 2025,
///     table_number: "32".to_string(),
///     period: "30B".to_string(),
///     income_from: dec!(0),
///     income_to: dec!(100000),
///     withholding: [dec!(10000); 7],
/// }];
/// let input = CarBenefitInput {
///     gross_salary: dec!(40000),
///     benefit_value: dec!(3000),
///     deduction_model: DeductionModel::Net,
///     gross_deduction: dec!(0),
///     net_deduction: dec!(1000),
///     private_leasing: dec!(0),
///     business_leasing: dec!(0),
///     employer_contribution: dec!(31.42),
/// };
///
/// let result = calculate_car_benefit(&input, &table, TaxColumn::SALARY).unwrap();
///
/// assert_eq!(result.taxable_benefit, dec!(2000));
/// assert_eq!(result.private_payment, dec!(1000));
/// assert_eq!(result.monthly_difference, dec!(-1000));
/// ```
pub fn calculate_car_benefit(
    input: &CarBenefitInput,
    tax_table: &[TaxTableEntry],
    column: TaxColumn,
) -> Result<CarBenefitResult, TaxTableError> {
    debug!(
        gross_salary = %input.gross_salary,
        benefit_value = %input.benefit_value,
        model = ?input.deduction_model,
        "calculating company car benefit"
    );

    let tax_without_car = lookup_withholding(input.gross_salary, tax_table, column)?;
    let net_salary_without_car = input.gross_salary - tax_without_car;

    let (adjusted_gross_salary, taxable_benefit, private_payment) = match input.deduction_model {
        DeductionModel::Gross => (
            non_negative(input.gross_salary - input.gross_deduction),
            input.benefit_value,
            Decimal::ZERO,
        ),
        DeductionModel::Net => {
            let deduction = non_negative(input.net_deduction);
            (
                input.gross_salary,
                non_negative(input.benefit_value - deduction),
                deduction.min(input.benefit_value),
            )
        }
    };
    let effective_benefit_value = taxable_benefit;

    let total_taxable_income = non_negative(adjusted_gross_salary + taxable_benefit);
    let tax_with_car = lookup_withholding(total_taxable_income, tax_table, column)?;
    let net_salary_with_car = adjusted_gross_salary - tax_with_car - private_payment;

    let employer_cost_benefit = percent_of(effective_benefit_value, input.employer_contribution);
    let employer_cost_total =
        percent_of(adjusted_gross_salary, input.employer_contribution) + employer_cost_benefit;

    let monthly_difference = net_salary_with_car - net_salary_without_car;

    Ok(CarBenefitResult {
        net_salary_without_car,
        tax_without_car,
        net_salary_with_car,
        tax_with_car,
        effective_benefit_value,
        monthly_difference,
        compared_to_private_leasing: leasing_comparison(monthly_difference, input.private_leasing),
        compared_to_business_leasing: leasing_comparison(
            monthly_difference,
            input.business_leasing,
        ),
        employer_cost_benefit,
        employer_cost_total,
        adjusted_gross_salary,
        taxable_benefit,
        private_payment,
    })
}

/// Picks the deduction model that leaves the higher net salary with the car.
///
/// Ties go to [`DeductionModel::Net`].
///
/// # Errors
///
/// Returns [`TaxTableError::EmptyTable`] when `tax_table` has no rows.
pub fn best_deduction_model(
    input: &CarBenefitInput,
    tax_table: &[TaxTableEntry],
    column: TaxColumn,
) -> Result<DeductionModel, TaxTableError> {
    let gross = calculate_car_benefit(
        &CarBenefitInput {
            deduction_model: DeductionModel::Gross,
            ..input.clone()
        },
        tax_table,
        column,
    )?;
    let net = calculate_car_benefit(
        &CarBenefitInput {
            deduction_model: DeductionModel::Net,
            ..input.clone()
        },
        tax_table,
        column,
    )?;

    if gross.net_salary_with_car > net.net_salary_with_car {
        Ok(DeductionModel::Gross)
    } else {
        Ok(DeductionModel::Net)
    }
}

fn leasing_comparison(
    monthly_difference: Decimal,
    leasing_cost: Decimal,
) -> Decimal {
    if leasing_cost > Decimal::ZERO {
        monthly_difference + leasing_cost
    } else {
        Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::tax_table::tests::sample_table;

    fn test_input() -> CarBenefitInput {
        CarBenefitInput {
            gross_salary: dec!(30000),
            benefit_value: dec!(3000),
            deduction_model: DeductionModel::Net,
            gross_deduction: dec!(0),
            net_deduction: dec!(0),
            private_leasing: dec!(0),
            business_leasing: dec!(0),
            employer_contribution: dec!(31.42),
        }
    }

    #[test]
    fn net_model_with_zero_deduction_taxes_full_benefit() {
        let table = sample_table();

        let result = calculate_car_benefit(&test_input(), &table, TaxColumn::SALARY)
            .expect("table is not empty");

        assert_eq!(result.effective_benefit_value, dec!(3000));
        assert_eq!(result.taxable_benefit, dec!(3000));
        assert_eq!(result.private_payment, Decimal::ZERO);
        assert_eq!(result.adjusted_gross_salary, dec!(30000));
    }

    #[test]
    fn without_car_uses_plain_salary_bracket() {
        let table = sample_table();

        let result = calculate_car_benefit(&test_input(), &table, TaxColumn::SALARY)
            .expect("table is not empty");

        assert_eq!(result.tax_without_car, dec!(6400));
        assert_eq!(result.net_salary_without_car, dec!(23600));
    }

    #[test]
    fn with_car_taxes_salary_plus_benefit() {
        let table = sample_table();

        let result = calculate_car_benefit(&test_input(), &table, TaxColumn::SALARY)
            .expect("table is not empty");

        assert_eq!(result.tax_with_car, dec!(7600));
        assert_eq!(result.net_salary_with_car, dec!(22400));
        assert_eq!(result.monthly_difference, dec!(-1200));
    }

    #[test]
    fn gross_model_reduces_salary_and_keeps_benefit_taxable() {
        let table = sample_table();
        let input = CarBenefitInput {
            deduction_model: DeductionModel::Gross,
            gross_deduction: dec!(2000),
            ..test_input()
        };

        let result =
            calculate_car_benefit(&input, &table, TaxColumn::SALARY).expect("table is not empty");

        assert_eq!(result.adjusted_gross_salary, dec!(28000));
        assert_eq!(result.taxable_benefit, dec!(3000));
        assert_eq!(result.tax_with_car, dec!(7000));
        assert_eq!(result.net_salary_with_car, dec!(21000));
        assert_eq!(result.private_payment, Decimal::ZERO);
    }

    #[test]
    fn gross_model_floors_salary_at_zero() {
        let table = sample_table();
        let input = CarBenefitInput {
            deduction_model: DeductionModel::Gross,
            gross_deduction: dec!(50000),
            ..test_input()
        };

        let result =
            calculate_car_benefit(&input, &table, TaxColumn::SALARY).expect("table is not empty");

        assert_eq!(result.adjusted_gross_salary, Decimal::ZERO);
        assert_eq!(result.tax_with_car, Decimal::ZERO);
    }

    #[test]
    fn net_model_lowers_benefit_and_charges_private_payment() {
        let table = sample_table();
        let input = CarBenefitInput {
            net_deduction: dec!(2000),
            ..test_input()
        };

        let result =
            calculate_car_benefit(&input, &table, TaxColumn::SALARY).expect("table is not empty");

        assert_eq!(result.taxable_benefit, dec!(1000));
        assert_eq!(result.private_payment, dec!(2000));
        assert_eq!(result.tax_with_car, dec!(7000));
        assert_eq!(result.net_salary_with_car, dec!(21000));
    }

    #[test]
    fn net_model_caps_private_payment_at_benefit_value() {
        let table = sample_table();
        let input = CarBenefitInput {
            net_deduction: dec!(5000),
            ..test_input()
        };

        let result =
            calculate_car_benefit(&input, &table, TaxColumn::SALARY).expect("table is not empty");

        assert_eq!(result.taxable_benefit, Decimal::ZERO);
        assert_eq!(result.private_payment, dec!(3000));
    }

    #[test]
    fn employer_cost_covers_salary_and_benefit() {
        let table = sample_table();

        let result = calculate_car_benefit(&test_input(), &table, TaxColumn::SALARY)
            .expect("table is not empty");

        assert_eq!(result.employer_cost_benefit, dec!(942.6));
        assert_eq!(result.employer_cost_total, dec!(10368.6));
    }

    #[test]
    fn leasing_comparison_only_when_cost_given() {
        let table = sample_table();
        let input = CarBenefitInput {
            private_leasing: dec!(4000),
            ..test_input()
        };

        let result =
            calculate_car_benefit(&input, &table, TaxColumn::SALARY).expect("table is not empty");

        assert_eq!(result.compared_to_private_leasing, dec!(2800));
        assert_eq!(result.compared_to_business_leasing, Decimal::ZERO);
    }

    #[test]
    fn empty_table_is_rejected() {
        let result = calculate_car_benefit(&test_input(), &[], TaxColumn::SALARY);

        assert_eq!(result, Err(TaxTableError::EmptyTable));
    }

    // =========================================================================
    // best_deduction_model tests
    // =========================================================================

    #[test]
    fn best_model_prefers_gross_when_strictly_better() {
        let table = sample_table();
        let input = CarBenefitInput {
            gross_deduction: dec!(1000),
            net_deduction: dec!(2000),
            ..test_input()
        };

        let model = best_deduction_model(&input, &table, TaxColumn::SALARY);

        assert_eq!(model, Ok(DeductionModel::Gross));
    }

    #[test]
    fn best_model_prefers_net_when_better() {
        let table = sample_table();
        let input = CarBenefitInput {
            gross_deduction: dec!(2000),
            net_deduction: dec!(1500),
            ..test_input()
        };

        let model = best_deduction_model(&input, &table, TaxColumn::SALARY);

        assert_eq!(model, Ok(DeductionModel::Net));
    }

    #[test]
    fn best_model_tie_goes_to_net() {
        let table = sample_table();
        let input = CarBenefitInput {
            gross_deduction: dec!(2000),
            net_deduction: dec!(2000),
            ..test_input()
        };

        let model = best_deduction_model(&input, &table, TaxColumn::SALARY);

        assert_eq!(model, Ok(DeductionModel::Net));
    }
}
