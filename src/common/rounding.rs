// src/common/rounding.rs

use rust_decimal::{Decimal, RoundingStrategy};

// Todas as regras de arredondamento de dinheiro moram aqui.
// Nenhum outro módulo chama .ceil()/.round_dp() diretamente.

/// Ajuste fixo somado a cada cota de lucro depois do arredondamento.
/// Regra comercial da casa: a cota nunca fica abaixo do valor proporcional,
/// então arredonda para o inteiro mais próximo e soma 1 unidade inteira.
/// A soma das cotas pode exceder o lucro líquido em até N unidades
/// (N = número de investidores). Comportamento esperado, não "corrigir".
pub const PROFIT_FAVOR_UNIT: Decimal = Decimal::ONE;

/// Teto em unidades inteiras de moeda.
/// Usado no valor da parcela: a divisão nunca fica abaixo do necessário
/// para cobrir o saldo (parcela × quantidade >= saldo).
pub fn ceil_to_unit(value: Decimal) -> Decimal {
    value.ceil()
}

/// Arredonda para o inteiro mais próximo, empate para longe do zero.
/// Atenção: o padrão do rust_decimal é arredondamento bancário
/// (empate para o par), que NÃO é o que o painel exibe. 0.5 sobe.
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Arredonda valores monetários derivados para 2 casas antes de persistir.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Cota de lucro de um investidor: inteiro mais próximo + 1 unidade.
pub fn round_profit_share(value: Decimal) -> Decimal {
    round_half_up(value) + PROFIT_FAVOR_UNIT
}

/// Razão investimento/capital com 8 casas, como persistida.
pub fn round_ratio(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(8, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn ceil_sobe_para_o_proximo_inteiro() {
        assert_eq!(ceil_to_unit(dec!(333.01)), dec!(334));
        assert_eq!(ceil_to_unit(dec!(333.99)), dec!(334));
        assert_eq!(ceil_to_unit(dec!(334)), dec!(334));
    }

    #[test]
    fn round_half_up_nao_usa_arredondamento_bancario() {
        // 0.5 sobe, 2.5 sobe: diferente do round_dp padrão (par mais próximo)
        assert_eq!(round_half_up(dec!(0.5)), dec!(1));
        assert_eq!(round_half_up(dec!(1.5)), dec!(2));
        assert_eq!(round_half_up(dec!(2.5)), dec!(3));
        assert_eq!(round_half_up(dec!(2.4)), dec!(2));
        assert_eq!(round_half_up(dec!(-0.5)), dec!(-1));
    }

    #[test]
    fn round_money_duas_casas() {
        assert_eq!(round_money(dec!(18333.33333)), dec!(18333.33));
        assert_eq!(round_money(dec!(18333.335)), dec!(18333.34));
    }

    #[test]
    fn cota_de_lucro_soma_exatamente_uma_unidade() {
        assert_eq!(round_profit_share(dec!(30000)), dec!(30001));
        assert_eq!(round_profit_share(dec!(69999.5)), dec!(70001));
        assert_eq!(round_profit_share(Decimal::ZERO), PROFIT_FAVOR_UNIT);
    }
}
