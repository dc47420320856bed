// ==========================================
// 默认施工阶段目录
// ==========================================
// 顺序: 准备 → 基础 → 主体 → (屋面 / 管线) → 装修 → 室外
// ==========================================

use crate::domain::schedule::StageTemplate;

pub const STAGE_PREPARATION: &str = "Preparation";
pub const STAGE_FOUNDATION: &str = "Foundation";
pub const STAGE_ROUGH_WORK: &str = "Rough work";
pub const STAGE_ROOFING: &str = "Roofing";
pub const STAGE_ENGINEERING: &str = "Engineering systems";
pub const STAGE_FINISHING: &str = "Finishing";
pub const STAGE_LANDSCAPING: &str = "Landscaping";

/// 默认阶段模板 (依赖关系已声明)
pub fn default_stage_templates() -> Vec<StageTemplate> {
    vec![
        StageTemplate::new(STAGE_PREPARATION, 1)
            .with_description("Подготовка участка, разметка, временные сооружения")
            .with_categories(&["preparation", "site", "earthworks"])
            .with_keywords(&["геотекстиль", "щебень", "песок", "geotextile", "gravel", "sand"]),
        StageTemplate::new(STAGE_FOUNDATION, 3)
            .with_description("Фундамент и гидроизоляция")
            .with_categories(&["foundation", "concrete", "waterproofing"])
            .with_keywords(&[
                "бетон",
                "цемент",
                "арматур",
                "опалубк",
                "гидроизоляц",
                "concrete",
                "cement",
                "rebar",
                "formwork",
            ])
            .after(&[STAGE_PREPARATION]),
        StageTemplate::new(STAGE_ROUGH_WORK, 4)
            .with_description("Стены, перекрытия, перегородки")
            .with_categories(&["walls", "masonry", "rough", "structure"])
            .with_keywords(&[
                "кирпич",
                "газобетон",
                "блок",
                "раствор",
                "перемычк",
                "brick",
                "block",
                "mortar",
                "lumber",
                "брус",
            ])
            .after(&[STAGE_FOUNDATION]),
        StageTemplate::new(STAGE_ROOFING, 2)
            .with_description("Кровля и водосточная система")
            .with_categories(&["roofing", "roof"])
            .with_keywords(&[
                "кровл", "черепиц", "водосток", "стропил", "roof", "shingle", "gutter",
            ])
            .after(&[STAGE_ROUGH_WORK]),
        StageTemplate::new(STAGE_ENGINEERING, 3)
            .with_description("Электрика, водоснабжение, отопление, вентиляция")
            .with_categories(&["engineering", "electrical", "plumbing", "heating"])
            .with_keywords(&[
                "кабель",
                "провод",
                "труб",
                "радиатор",
                "розетк",
                "автомат",
                "cable",
                "wire",
                "pipe",
                "radiator",
            ])
            .after(&[STAGE_ROUGH_WORK]),
        StageTemplate::new(STAGE_FINISHING, 4)
            .with_description("Штукатурка, отделка стен и полов")
            .with_categories(&["finishing", "paint", "flooring", "tiles"])
            .with_keywords(&[
                "штукатур",
                "шпакл",
                "грунтовк",
                "краск",
                "плитк",
                "ламинат",
                "обои",
                "plaster",
                "paint",
                "tile",
                "laminate",
            ])
            .after(&[STAGE_ROOFING, STAGE_ENGINEERING]),
        StageTemplate::new(STAGE_LANDSCAPING, 2)
            .with_description("Благоустройство территории")
            .with_categories(&["landscaping", "exterior"])
            .with_keywords(&["брусчатк", "бордюр", "газон", "paving", "curb", "lawn"])
            .after(&[STAGE_FINISHING]),
    ]
}
