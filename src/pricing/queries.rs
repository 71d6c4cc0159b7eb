//! Database queries for the pricing engine.
//!
//! Every table is read inside one read-only, repeatable-read transaction so a
//! snapshot never mixes rows from before and after a concurrent edit.

use sqlx::{PgConnection, PgPool};
use tracing::{info, warn};

use crate::error::AppError;

use super::models::{
    CoefficientRow, CutTypeRow, FinishPriceRow, FinishRow, MaterialRow, PriceTierRow, RibbonRow,
    SettingRow, SpecialCutRow,
};
use super::settings::{SettingType, SettingValue, SettingsError};
use super::snapshot::PricingSnapshot;

/// All materials, retired ones included; old orders still reference them
pub async fn fetch_materials(conn: &mut PgConnection) -> Result<Vec<MaterialRow>, AppError> {
    let rows = sqlx::query_as::<_, MaterialRow>(
        r#"
        SELECT id::BIGINT AS id, nome AS name, ativo AS active
        FROM orcamento_tipomaterial
        ORDER BY ordem, nome
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows)
}

/// All cut types, retired ones included
pub async fn fetch_cut_types(conn: &mut PgConnection) -> Result<Vec<CutTypeRow>, AppError> {
    let rows = sqlx::query_as::<_, CutTypeRow>(
        r#"
        SELECT id::BIGINT AS id, nome AS name, codigo_calc AS cut_code, ativo AS active
        FROM orcamento_tipocorte
        ORDER BY nome
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows)
}

/// All finishes, retired ones included
pub async fn fetch_finishes(conn: &mut PgConnection) -> Result<Vec<FinishRow>, AppError> {
    let rows = sqlx::query_as::<_, FinishRow>(
        r#"
        SELECT id::BIGINT AS id, nome AS name, ativo AS active
        FROM orcamento_acabamento
        ORDER BY ordem, nome
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows)
}

/// Price per meter for every (material, length tier)
pub async fn fetch_price_tiers(conn: &mut PgConnection) -> Result<Vec<PriceTierRow>, AppError> {
    let rows = sqlx::query_as::<_, PriceTierRow>(
        r#"
        SELECT
            tipo_material_id::BIGINT AS material_id,
            metragem AS tier,
            preco_metro AS price
        FROM orcamento_tabelapreco
        ORDER BY tipo_material_id, metragem
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows)
}

/// Width coefficients keyed by the cut type's stored code
pub async fn fetch_coefficients(conn: &mut PgConnection) -> Result<Vec<CoefficientRow>, AppError> {
    let rows = sqlx::query_as::<_, CoefficientRow>(
        r#"
        SELECT
            cf.largura AS width,
            cf.tipo_material_id::BIGINT AS material_id,
            tc.codigo_calc AS cut_code,
            cf.coeficiente AS coefficient
        FROM orcamento_coeficientefator cf
        JOIN orcamento_tipocorte tc ON tc.id = cf.codigo_corte_id
        ORDER BY cf.tipo_material_id, tc.codigo_calc, cf.largura
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows)
}

/// Finish surcharges by width
pub async fn fetch_finish_prices(conn: &mut PgConnection) -> Result<Vec<FinishPriceRow>, AppError> {
    let rows = sqlx::query_as::<_, FinishPriceRow>(
        r#"
        SELECT
            largura_mm AS width,
            acabamento_id::BIGINT AS finish_id,
            preco AS price
        FROM orcamento_precoacabamento
        ORDER BY acabamento_id, largura_mm
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows)
}

/// Canvas and satin cut surcharges by width
pub async fn fetch_special_cuts(conn: &mut PgConnection) -> Result<Vec<SpecialCutRow>, AppError> {
    let rows = sqlx::query_as::<_, SpecialCutRow>(
        r#"
        SELECT largura AS width, canvas, cetim AS satin
        FROM orcamento_valorcorte
        ORDER BY largura
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows)
}

/// Ribbon factors by width
pub async fn fetch_ribbon_factors(conn: &mut PgConnection) -> Result<Vec<RibbonRow>, AppError> {
    let rows = sqlx::query_as::<_, RibbonRow>(
        r#"
        SELECT largura_mm AS width, fator AS factor
        FROM orcamento_fita
        ORDER BY largura_mm
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows)
}

/// Global key/value settings
pub async fn fetch_settings(conn: &mut PgConnection) -> Result<Vec<SettingRow>, AppError> {
    let rows = sqlx::query_as::<_, SettingRow>(
        r#"
        SELECT chave AS key, valor AS value, tipo_dado AS data_type
        FROM orcamento_configuracao
        ORDER BY chave
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows)
}

/// Read every pricing table and assemble a snapshot.
///
/// Settings rows that fail to decode are skipped with a warning; the
/// affected setting then falls back to its default.
pub async fn load_snapshot(pool: &PgPool) -> Result<PricingSnapshot, AppError> {
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
        .execute(&mut *tx)
        .await?;

    let materials = fetch_materials(&mut *tx).await?;
    let cut_types = fetch_cut_types(&mut *tx).await?;
    let finishes = fetch_finishes(&mut *tx).await?;
    let price_tiers = fetch_price_tiers(&mut *tx).await?;
    let coefficients = fetch_coefficients(&mut *tx).await?;
    let finish_prices = fetch_finish_prices(&mut *tx).await?;
    let special_cuts = fetch_special_cuts(&mut *tx).await?;
    let ribbon_factors = fetch_ribbon_factors(&mut *tx).await?;
    let settings = fetch_settings(&mut *tx).await?;

    tx.commit().await?;

    let mut builder = PricingSnapshot::builder();
    for row in &materials {
        builder = builder.material(row.id, &row.name);
        if !row.active {
            builder = builder.deactivate_material(row.id);
        }
    }
    for row in &cut_types {
        builder = builder.cut_type(row.id, &row.name, row.cut_code);
        if !row.active {
            builder = builder.deactivate_cut_type(row.id);
        }
    }
    for row in &finishes {
        builder = builder.finish(row.id, &row.name);
        if !row.active {
            builder = builder.deactivate_finish(row.id);
        }
    }
    for row in price_tiers {
        builder = builder.price_tier(row.material_id, row.tier, row.price);
    }
    for row in coefficients {
        builder = builder.coefficient(row.width, row.material_id, row.cut_code, row.coefficient);
    }
    for row in finish_prices {
        builder = builder.finish_surcharge(row.width, row.finish_id, row.price);
    }
    for row in special_cuts {
        builder = builder.special_cut(row.width, row.canvas, row.satin);
    }
    for row in ribbon_factors {
        builder = builder.ribbon_factor(row.width, row.factor);
    }
    for row in settings {
        match decode_setting(&row) {
            Ok(value) => builder = builder.setting(&row.key, value),
            Err(e) => warn!("Skipping setting {}: {}", row.key, e),
        }
    }

    let snapshot = builder.build();
    info!("Pricing snapshot loaded: {:?}", snapshot.info());
    Ok(snapshot)
}

fn decode_setting(row: &SettingRow) -> Result<SettingValue, SettingsError> {
    let kind: SettingType = row.data_type.parse()?;
    SettingValue::decode(&row.value, kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(key: &str, value: &str, data_type: &str) -> SettingRow {
        SettingRow {
            key: key.to_string(),
            value: value.to_string(),
            data_type: data_type.to_string(),
        }
    }

    #[test]
    fn test_decode_setting_row() {
        let value = decode_setting(&row("perc_ultrassonico", "1.15", "decimal")).unwrap();
        assert_eq!(value.as_decimal(), Some(dec!(1.15)));

        let value = decode_setting(&row("usar_tabela", "sim", "boolean")).unwrap();
        assert_eq!(value, SettingValue::Boolean(true));
    }

    #[test]
    fn test_decode_setting_row_errors() {
        assert!(decode_setting(&row("perc_ultrassonico", "abc", "decimal")).is_err());
        assert!(decode_setting(&row("perc_ultrassonico", "1.15", "json")).is_err());
    }
}
