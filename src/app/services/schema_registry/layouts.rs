//! Static record layout tables
//!
//! Field lists exclude the leading REG column, which is the type code itself.

use super::TotalSpec;

/// Ordered field names per record type
pub(super) const LAYOUTS: &[(&str, &[&str])] = &[
    // Block C: fiscal documents I
    ("C010", &["CNPJ", "IND_ESCRI"]),
    (
        "C100",
        &[
            "IND_OPER", "IND_EMIT", "COD_PART", "COD_MOD", "COD_SIT", "SER", "NUM_DOC",
            "CHV_NFE", "DT_DOC", "DT_E_S", "VL_DOC", "IND_PGTO", "VL_DESC", "VL_ABAT_NT",
            "VL_MERC", "IND_FRT", "VL_FRT", "VL_SEG", "VL_OUT_DA", "VL_BC_ICMS", "VL_ICMS",
            "VL_BC_ICMS_ST", "VL_ICMS_ST", "VL_IPI", "VL_PIS", "VL_COFINS", "VL_PIS_ST",
            "VL_COFINS_ST",
        ],
    ),
    (
        "C170",
        &[
            "NUM_ITEM", "COD_ITEM", "DESCR_COMPL", "QTD", "UNID", "VL_ITEM", "VL_DESC",
            "IND_MOV", "CST_ICMS", "CFOP", "COD_NAT", "VL_BC_ICMS", "ALIQ_ICMS", "VL_ICMS",
            "VL_BC_ICMS_ST", "ALIQ_ST", "VL_ICMS_ST", "IND_APUR", "CST_IPI", "COD_ENQ",
            "VL_BC_IPI", "ALIQ_IPI", "VL_IPI", "CST_PIS", "VL_BC_PIS", "ALIQ_PIS",
            "QUANT_BC_PIS", "ALIQ_PIS_QUANT", "VL_PIS", "CST_COFINS", "VL_BC_COFINS",
            "ALIQ_COFINS", "QUANT_BC_COFINS", "ALIQ_COFINS_QUANT", "VL_COFINS", "COD_CTA",
        ],
    ),
    (
        "C190",
        &[
            "CST_ICMS", "CFOP", "ALIQ_ICMS", "VL_OPR", "VL_BC_ICMS", "VL_ICMS",
            "VL_BC_ICMS_ST", "VL_ICMS_ST", "VL_RED_BC", "VL_IPI", "COD_OBS",
        ],
    ),
    ("C195", &["COD_OBS", "TXT_COMPL"]),
    (
        "C197",
        &[
            "COD_AJ", "DESCR_COMPL_AJ", "COD_ITEM", "VL_BC_ICMS", "ALIQ_ICMS", "VL_ICMS",
            "VL_OUTROS",
        ],
    ),
    (
        "C500",
        &[
            "COD_PART", "COD_MOD", "COD_SIT", "SER", "SUB", "NUM_DOC", "DT_DOC", "DT_ENT",
            "VL_DOC", "VL_ICMS", "COD_INF", "VL_PIS", "VL_COFINS", "CHV_DOCe",
        ],
    ),
    (
        "C501",
        &[
            "CST_PIS", "VL_ITEM", "NAT_BC_CRED", "VL_BC_PIS", "ALIQ_PIS", "VL_PIS", "COD_CTA",
        ],
    ),
    (
        "C505",
        &[
            "CST_COFINS", "VL_ITEM", "NAT_BC_CRED", "VL_BC_COFINS", "ALIQ_COFINS", "VL_COFINS",
            "COD_CTA",
        ],
    ),
    // Block D: fiscal documents II (services)
    ("D010", &["CNPJ"]),
    (
        "D100",
        &[
            "IND_OPER", "IND_EMIT", "COD_PART", "COD_MOD", "COD_SIT", "SER", "SUB", "NUM_DOC",
            "CHV_CTE", "DT_DOC", "DT_A_P", "TP_CT_E", "CHV_CTE_REF", "VL_DOC", "VL_DESC",
            "IND_FRT", "VL_SERV", "VL_BC_ICMS", "VL_ICMS", "VL_NT", "COD_INF", "COD_CTA",
            "COD_MUN_ORIG", "COD_MUN_DEST",
        ],
    ),
    (
        "D170",
        &[
            "COD_ITEM", "DESCR_COMPL", "QTD", "UNID", "VL_ITEM", "VL_DESC", "IND_MOV",
            "CST_ICMS", "CFOP", "COD_NAT", "VL_BC_ICMS", "ALIQ_ICMS", "VL_ICMS",
            "VL_BC_ICMS_ST", "ALIQ_ST", "VL_ICMS_ST", "IND_APUR", "COD_CTA",
        ],
    ),
    (
        "D190",
        &[
            "CST_ICMS", "CFOP", "ALIQ_ICMS", "VL_OPR", "VL_BC_ICMS", "VL_ICMS", "VL_RED_BC",
            "COD_OBS",
        ],
    ),
    (
        "D101",
        &[
            "IND_NAT_FRT", "VL_ITEM", "CST_PIS", "NAT_BC_CRED", "VL_BC_PIS", "ALIQ_PIS",
            "VL_PIS", "COD_CTA",
        ],
    ),
    (
        "D105",
        &[
            "IND_NAT_FRT", "VL_ITEM", "CST_COFINS", "NAT_BC_CRED", "VL_BC_COFINS",
            "ALIQ_COFINS", "VL_COFINS", "COD_CTA",
        ],
    ),
    (
        "D500",
        &[
            "IND_OPER", "IND_EMIT", "COD_PART", "COD_MOD", "COD_SIT", "SER", "SUB", "NUM_DOC",
            "DT_DOC", "DT_A_P", "VL_DOC", "VL_DESC", "VL_SERV", "VL_SERV_NT", "VL_TERC",
            "VL_DA", "VL_BC_ICMS", "VL_ICMS", "COD_INF", "VL_PIS", "VL_COFINS", "CHV_DOCe",
        ],
    ),
    (
        "D501",
        &[
            "CST_PIS", "VL_ITEM", "NAT_BC_CRED", "VL_BC_PIS", "ALIQ_PIS", "VL_PIS", "COD_CTA",
        ],
    ),
    (
        "D505",
        &[
            "CST_COFINS", "VL_ITEM", "NAT_BC_CRED", "VL_BC_COFINS", "ALIQ_COFINS", "VL_COFINS",
            "COD_CTA",
        ],
    ),
    (
        "D700",
        &[
            "IND_OPER", "IND_EMIT", "COD_PART", "COD_MOD", "COD_SIT", "SER", "NUM_DOC",
            "DT_DOC", "DT_E_S", "VL_DOC", "VL_DESC", "VL_SERV", "VL_SERV_NT", "VL_TERC",
            "VL_DA", "VL_BC_ICMS", "VL_ICMS", "COD_INF", "VL_PIS", "VL_COFINS", "CHV_DOCe",
            "FIN_DOCe", "TIP_FAT", "COD_MOD_DOC_REF", "CHV_DOCe_REF", "HASH_DOC_REF",
            "SER_DOC_REF", "NUM_DOC_REF", "MES_DOC_REF", "COD_MUN_DEST", "DED",
        ],
    ),
    // Block A: fiscal documents III (services, ISS)
    ("A001", &["IND_MOV"]),
    ("A010", &["CNPJ"]),
    (
        "A100",
        &[
            "IND_OPER", "IND_EMIT", "COD_PART", "COD_SIT", "SER", "SUB", "NUM_DOC", "CHV_NFSE",
            "DT_DOC", "DT_EXE_SERV", "VL_DOC", "IND_PGTO", "VL_DESC", "VL_BC_PIS", "VL_PIS",
            "VL_BC_COFINS", "VL_COFINS", "VL_PIS_RET", "VL_COFINS_RET", "VL_ISS",
        ],
    ),
    // Block F: other documents and operations
    ("F001", &["IND_MOV"]),
    ("F010", &["CNPJ"]),
    (
        "F100",
        &[
            "IND_OPER", "COD_PART", "COD_ITEM", "DT_OPER", "VL_OPER", "CST_PIS", "VL_BC_PIS",
            "ALIQ_PIS", "VL_PIS", "CST_COFINS", "VL_BC_COFINS", "ALIQ_COFINS", "VL_COFINS",
            "NAT_BC_CRED", "IND_ORIG_CRED", "COD_CTA", "COD_CCUS", "DESC_COMPL",
        ],
    ),
    ("F111", &["NUM_PROC", "IND_PROC"]),
    // Block M: contribution assessment
    ("M001", &["IND_MOV"]),
    (
        "M100",
        &[
            "COD_CRED", "IND_CRED_ORI", "VL_BC_PIS", "ALIQ_PIS", "QUANT_BC_PIS",
            "ALIQ_PIS_QUANT", "VL_CRED", "VL_AJUS_ACRES", "VL_AJUS_REDUC", "VL_CRED_DIF",
            "VL_CRED_DISP", "IND_DESC_CRED", "VL_CRED_DESC", "SLD_CRED",
        ],
    ),
    (
        "M105",
        &[
            "NAT_BC_CRED", "CST_PIS", "VL_BC_PIS_TOT", "VL_BC_PIS_CUM", "VL_BC_PIS_NC",
            "VL_BC_PIS", "QUANT_BC_PIS_TOT", "QUANT_BC_PIS", "DESC_CRED",
        ],
    ),
    ("M110", &["IND_AJ", "VL_AJ", "COD_AJ", "NUM_DOC", "DESCR_AJ", "DT_REF"]),
    (
        "M115",
        &[
            "DET_VALOR_AJ", "CST_PIS", "DET_BC_CRED", "DET_ALIQ", "DT_OPER_AJ", "DESC_AJ",
            "COD_CTA", "INFO_COMPL",
        ],
    ),
    // Block E: ICMS/IPI assessment
    ("E001", &["IND_DAD"]),
    ("E100", &["DT_INI", "DT_FIN"]),
    (
        "E110",
        &[
            "VL_TOT_DEBITOS", "VL_AJ_DEBITOS", "VL_TOT_AJ_DEBITOS", "VL_ESTORNOS_CRED",
            "VL_TOT_CREDITOS", "VL_AJ_CREDITOS", "VL_TOT_AJ_CREDITOS", "VL_ESTORNOS_DEB",
            "VL_SLD_CREDOR_ANT", "VL_SLD_APURADO", "VL_TOT_DED", "VL_ICMS_RECOLHER",
            "VL_SLD_CREDOR_TRANSPORTAR", "DEB_ESP",
        ],
    ),
    ("E111", &["COD_AJ_APUR", "DESCR_COMPL_AJ", "VL_AJ_APUR"]),
    ("E112", &["NUM_DA", "NUM_PROC", "IND_PROC", "PROC", "COD_OBS"]),
    (
        "E113",
        &[
            "COD_PART", "COD_MOD", "SER", "SUB", "NUM_DOC", "DT_DOC", "COD_ITEM", "VL_AJ_ITEM",
            "CHV_DOCe",
        ],
    ),
    ("E115", &["COD_INF_ADIC", "VL_INF_ADIC", "DESCR_COMPL_AJ"]),
    (
        "E116",
        &[
            "COD_OR", "VL_OR", "DT_VCTO", "COD_REC", "NUM_PROC", "IND_PROC", "PROC",
            "TXT_COMPL", "MES_REF",
        ],
    ),
    // Block 9: file terminator
    ("9999", &["QTD_LIN"]),
];

/// Monetary and quantity fields parsed as Brazilian decimals
pub(super) const DECIMAL_FIELDS: &[(&str, &[&str])] = &[
    (
        "C100",
        &[
            "VL_DOC", "VL_DESC", "VL_ABAT_NT", "VL_MERC", "VL_FRT", "VL_SEG", "VL_OUT_DA",
            "VL_BC_ICMS", "VL_ICMS", "VL_BC_ICMS_ST", "VL_ICMS_ST", "VL_IPI", "VL_PIS",
            "VL_COFINS", "VL_PIS_ST", "VL_COFINS_ST",
        ],
    ),
    (
        "C170",
        &[
            "QTD", "VL_ITEM", "VL_DESC", "VL_BC_ICMS", "ALIQ_ICMS", "VL_ICMS", "VL_BC_ICMS_ST",
            "ALIQ_ST", "VL_ICMS_ST", "VL_BC_IPI", "ALIQ_IPI", "VL_IPI", "VL_BC_PIS",
            "ALIQ_PIS", "QUANT_BC_PIS", "ALIQ_PIS_QUANT", "VL_PIS", "VL_BC_COFINS",
            "ALIQ_COFINS", "QUANT_BC_COFINS", "ALIQ_COFINS_QUANT", "VL_COFINS",
        ],
    ),
    (
        "C190",
        &[
            "ALIQ_ICMS", "VL_OPR", "VL_BC_ICMS", "VL_ICMS", "VL_BC_ICMS_ST", "VL_ICMS_ST",
            "VL_RED_BC", "VL_IPI",
        ],
    ),
    ("C197", &["VL_BC_ICMS", "ALIQ_ICMS", "VL_ICMS", "VL_OUTROS"]),
    ("C500", &["VL_DOC", "VL_ICMS", "VL_PIS", "VL_COFINS"]),
    ("C501", &["VL_ITEM", "VL_BC_PIS", "ALIQ_PIS", "VL_PIS"]),
    ("C505", &["VL_ITEM", "VL_BC_COFINS", "ALIQ_COFINS", "VL_COFINS"]),
    ("D100", &["VL_DOC", "VL_DESC", "VL_SERV", "VL_BC_ICMS", "VL_ICMS", "VL_NT"]),
    (
        "D170",
        &[
            "QTD", "VL_ITEM", "VL_DESC", "VL_BC_ICMS", "ALIQ_ICMS", "VL_ICMS", "VL_BC_ICMS_ST",
            "ALIQ_ST", "VL_ICMS_ST",
        ],
    ),
    ("D190", &["ALIQ_ICMS", "VL_OPR", "VL_BC_ICMS", "VL_ICMS", "VL_RED_BC"]),
    ("D101", &["VL_ITEM", "VL_BC_PIS", "ALIQ_PIS", "VL_PIS"]),
    ("D105", &["VL_ITEM", "VL_BC_COFINS", "ALIQ_COFINS", "VL_COFINS"]),
    (
        "D500",
        &[
            "VL_DOC", "VL_DESC", "VL_SERV", "VL_SERV_NT", "VL_TERC", "VL_DA", "VL_BC_ICMS",
            "VL_ICMS", "VL_PIS", "VL_COFINS",
        ],
    ),
    ("D501", &["VL_ITEM", "VL_BC_PIS", "ALIQ_PIS", "VL_PIS"]),
    ("D505", &["VL_ITEM", "VL_BC_COFINS", "ALIQ_COFINS", "VL_COFINS"]),
    (
        "D700",
        &[
            "VL_DOC", "VL_DESC", "VL_SERV", "VL_SERV_NT", "VL_TERC", "VL_DA", "VL_BC_ICMS",
            "VL_ICMS", "VL_PIS", "VL_COFINS", "DED",
        ],
    ),
    (
        "A100",
        &[
            "VL_DOC", "VL_DESC", "VL_BC_PIS", "VL_PIS", "VL_BC_COFINS", "VL_COFINS",
            "VL_PIS_RET", "VL_COFINS_RET", "VL_ISS",
        ],
    ),
    (
        "F100",
        &[
            "VL_OPER", "VL_BC_PIS", "ALIQ_PIS", "VL_PIS", "VL_BC_COFINS", "ALIQ_COFINS",
            "VL_COFINS",
        ],
    ),
    (
        "M100",
        &[
            "VL_BC_PIS", "ALIQ_PIS", "QUANT_BC_PIS", "ALIQ_PIS_QUANT", "VL_CRED",
            "VL_AJUS_ACRES", "VL_AJUS_REDUC", "VL_CRED_DIF", "VL_CRED_DISP", "VL_CRED_DESC",
            "SLD_CRED",
        ],
    ),
    (
        "M105",
        &[
            "VL_BC_PIS_TOT", "VL_BC_PIS_CUM", "VL_BC_PIS_NC", "VL_BC_PIS", "QUANT_BC_PIS_TOT",
            "QUANT_BC_PIS",
        ],
    ),
    ("M110", &["VL_AJ"]),
    ("M115", &["DET_VALOR_AJ", "DET_BC_CRED", "DET_ALIQ"]),
    (
        "E110",
        &[
            "VL_TOT_DEBITOS", "VL_AJ_DEBITOS", "VL_TOT_AJ_DEBITOS", "VL_ESTORNOS_CRED",
            "VL_TOT_CREDITOS", "VL_AJ_CREDITOS", "VL_TOT_AJ_CREDITOS", "VL_ESTORNOS_DEB",
            "VL_SLD_CREDOR_ANT", "VL_SLD_APURADO", "VL_TOT_DED", "VL_ICMS_RECOLHER",
            "VL_SLD_CREDOR_TRANSPORTAR", "DEB_ESP",
        ],
    ),
    ("E111", &["VL_AJ_APUR"]),
    ("E113", &["VL_AJ_ITEM"]),
    ("E115", &["VL_INF_ADIC"]),
    ("E116", &["VL_OR"]),
];

/// Fields that must be present and non-empty
pub(super) const REQUIRED_FIELDS: &[(&str, &[&str])] = &[
    ("C010", &["CNPJ"]),
    (
        "C100",
        &["IND_OPER", "IND_EMIT", "COD_PART", "COD_MOD", "NUM_DOC", "DT_DOC"],
    ),
    ("C170", &["NUM_ITEM", "COD_ITEM", "QTD", "VL_ITEM"]),
    ("C500", &["COD_PART", "COD_MOD", "NUM_DOC", "DT_DOC"]),
    ("D010", &["CNPJ"]),
    (
        "D100",
        &["IND_OPER", "IND_EMIT", "COD_PART", "COD_MOD", "NUM_DOC", "DT_DOC"],
    ),
    (
        "D500",
        &["IND_OPER", "IND_EMIT", "COD_PART", "COD_MOD", "NUM_DOC", "DT_DOC"],
    ),
    (
        "D700",
        &["IND_OPER", "IND_EMIT", "COD_PART", "COD_MOD", "NUM_DOC", "DT_DOC"],
    ),
    ("A010", &["CNPJ"]),
    ("A100", &["IND_OPER", "IND_EMIT", "COD_PART", "NUM_DOC", "DT_DOC"]),
    ("F010", &["CNPJ"]),
    ("F100", &["IND_OPER", "COD_PART", "DT_OPER"]),
    ("E100", &["DT_INI", "DT_FIN"]),
];

/// Access key fields validated as 44-digit keys
pub(super) const ACCESS_KEY_FIELDS: &[&str] = &["CHV_NFE", "CHV_CTE", "CHV_DOCe"];

/// Parent totals cross-checked against the sum of a child field
pub(super) const TOTAL_CHECKS: &[(&str, TotalSpec)] = &[
    (
        "C100",
        TotalSpec {
            parent_field: "VL_MERC",
            child_type: "C170",
            child_field: "VL_ITEM",
        },
    ),
    (
        "C500",
        TotalSpec {
            parent_field: "VL_PIS",
            child_type: "C501",
            child_field: "VL_PIS",
        },
    ),
    (
        "D500",
        TotalSpec {
            parent_field: "VL_PIS",
            child_type: "D501",
            child_field: "VL_PIS",
        },
    ),
];

/// Parents that must have at least one child
pub(super) const REQUIRES_CHILDREN: &[&str] = &["C500", "D500"];
