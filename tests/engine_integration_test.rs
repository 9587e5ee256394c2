// ==========================================
// 引擎间集成测试
// ==========================================
// 职责: 验证编辑会话、指派校验、名额核算与冲突检测的协作
// 场景: EditSession → AssignmentValidator/CapAccountant → ConflictDetector
// ==========================================

use extra_duty_roster::domain::conflict::Conflict;
use extra_duty_roster::domain::roster::OrdinaryRoster;
use extra_duty_roster::domain::schedule::{CombinedSchedules, MonthKey, MonthlySchedule};
use extra_duty_roster::domain::types::{Operation, Team};
use extra_duty_roster::engine::{AssignError, ConflictDetector, EditSession};

// ==========================================
// 测试辅助函数
// ==========================================

fn march() -> MonthKey {
    MonthKey::new(2026, 3)
}

/// 标准名册 (短名, 引擎层不关心警衔前缀)
fn standard_roster() -> Vec<String> {
    ["MUNIZ", "SILVA", "COSTA", "OLIMAR", "PEREIRA", "RAMOS", "NUNES"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn open_session(operation: Operation, state: CombinedSchedules) -> EditSession {
    EditSession::new(operation, state, standard_roster(), 12)
}

// ==========================================
// 测试 1: 跨勤务名额滚动结算
// ==========================================

#[test]
fn test_integration_full_month_cap_rollover() {
    // 另一勤务已占 4 个名额
    let mut base = CombinedSchedules::new(march());
    for day in 1..=4 {
        base.transito.day_slots_mut(day)[0] = Some("MUNIZ".to_string());
    }

    let mut session = open_session(Operation::Pmf, base);

    // Step 1: 本勤务再排 8 天, 正好用满 12 个名额
    for day in 5..=12 {
        session
            .try_assign(day, 0, Some("MUNIZ".to_string()))
            .unwrap_or_else(|e| panic!("第 {} 日指派应成功: {}", day, e));
    }
    assert_eq!(session.count_for("MUNIZ"), 12);
    assert_eq!(session.remaining_for("MUNIZ"), 0);

    // Step 2: 第 13 个名额被拒绝, 工作副本不动
    let result = session.try_assign(13, 0, Some("MUNIZ".to_string()));
    match result {
        Err(AssignError::CapExceeded { officer, count, cap }) => {
            assert_eq!(officer, "MUNIZ");
            assert_eq!(count, 12);
            assert_eq!(cap, 12);
        }
        other => panic!("应返回 CapExceeded, 实际: {:?}", other),
    }
    assert_eq!(session.schedule().day_slots(13), None, "拒绝不得创建日条目");

    // Step 3: 清出一个名额后可继续指派
    session.try_assign(5, 0, None).unwrap();
    assert_eq!(session.count_for("MUNIZ"), 11);
    session.try_assign(13, 0, Some("MUNIZ".to_string())).unwrap();
    assert_eq!(session.count_for("MUNIZ"), 12);

    // Step 4: 交出工作副本, 变更齐全
    let schedule = session.into_schedule();
    assert_eq!(schedule.operation, Operation::Pmf);
    assert_eq!(schedule.slot(5, 0), None);
    assert_eq!(schedule.slot(13, 0), Some("MUNIZ"));
}

// ==========================================
// 测试 2: 编辑→检测全链路
// ==========================================

#[test]
fn test_integration_edit_then_detect_pipeline() {
    let mut roster = OrdinaryRoster::new(march());
    roster.set_duty(2, Team::TeamA);
    roster.set_duty(3, Team::TeamB);
    roster.set_members(Team::TeamA, vec!["MUNIZ".to_string(), "SILVA".to_string()]);
    roster.set_members(Team::TeamB, vec!["OLIMAR".to_string(), "PEREIRA".to_string()]);

    // Step 1: 会话内编辑 PMF
    let mut session = open_session(Operation::Pmf, CombinedSchedules::new(march()));
    session.try_assign(2, 0, Some("MUNIZ".to_string())).unwrap(); // 值班重叠
    session.try_assign(2, 1, Some("NUNES".to_string())).unwrap(); // 干净
    session.try_assign(3, 0, Some("PEREIRA".to_string())).unwrap(); // 值班重叠

    // Step 2: 外部取回另一勤务快照
    let mut transito = MonthlySchedule::new(Operation::Transito, march());
    transito.day_slots_mut(3)[0] = Some("OLIMAR".to_string()); // 值班重叠
    transito.day_slots_mut(3)[1] = Some("PEREIRA".to_string()); // 值班重叠 + 跨勤务重复
    session.refresh_other(transito);

    // Step 3: 对会话工作态做整月检测
    let conflicts = ConflictDetector::detect(session.combined(), &roster, march());
    let expected = vec![
        Conflict::overlap(2, "MUNIZ", Team::TeamA, Operation::Pmf),
        Conflict::overlap(3, "PEREIRA", Team::TeamB, Operation::Pmf),
        Conflict::overlap(3, "OLIMAR", Team::TeamB, Operation::Transito),
        Conflict::overlap(3, "PEREIRA", Team::TeamB, Operation::Transito),
        Conflict::duplicated(3, "PEREIRA"),
    ];
    assert_eq!(conflicts, expected);

    // Step 4: 重跑结果逐条一致
    let rerun = ConflictDetector::detect(session.combined(), &roster, march());
    assert_eq!(rerun, conflicts);
}

// ==========================================
// 测试 3: 同日换岗
// ==========================================

#[test]
fn test_integration_move_officer_across_slots() {
    let mut session = open_session(Operation::Pmf, CombinedSchedules::new(march()));
    session.try_assign(1, 0, Some("MUNIZ".to_string())).unwrap();

    // 直接挪岗被同日唯一性拦截
    let result = session.try_assign(1, 1, Some("MUNIZ".to_string()));
    assert!(matches!(
        result,
        Err(AssignError::DuplicateInDay { existing_slot: 0, .. })
    ));

    // 先清后排完成换岗, 名额占用不变
    session.try_assign(1, 0, None).unwrap();
    session.try_assign(1, 1, Some("MUNIZ".to_string())).unwrap();
    assert_eq!(session.schedule().slot(1, 0), None);
    assert_eq!(session.schedule().slot(1, 1), Some("MUNIZ"));
    assert_eq!(session.count_for("MUNIZ"), 1);
}

// ==========================================
// 测试 4: 幂等指派不置脏
// ==========================================

#[test]
fn test_integration_idempotent_reassign_keeps_session_clean() {
    let mut base = CombinedSchedules::new(march());
    base.pmf.day_slots_mut(1)[0] = Some("MUNIZ".to_string());

    let mut session = open_session(Operation::Pmf, base);
    assert!(!session.is_dirty());

    // 重复指派已占用的同一岗位: 成功但无变更
    session.try_assign(1, 0, Some("MUNIZ".to_string())).unwrap();
    assert!(!session.is_dirty());

    session.try_assign(2, 0, Some("SILVA".to_string())).unwrap();
    assert!(session.is_dirty());
}

// ==========================================
// 测试 5: 快照刷新参与名额核算
// ==========================================

#[test]
fn test_integration_refresh_other_feeds_cap_accounting() {
    let mut session = open_session(Operation::Pmf, CombinedSchedules::new(march()));
    for day in 1..=11 {
        session.try_assign(day, 0, Some("MUNIZ".to_string())).unwrap();
    }
    assert_eq!(session.count_for("MUNIZ"), 11);

    // 另一勤务在会话期间新排了 MUNIZ, 刷新快照后名额立即收紧
    let mut other = MonthlySchedule::new(Operation::Transito, march());
    other.day_slots_mut(20)[0] = Some("MUNIZ".to_string());
    session.refresh_other(other);
    assert_eq!(session.count_for("MUNIZ"), 12);

    let result = session.try_assign(25, 0, Some("MUNIZ".to_string()));
    assert!(matches!(
        result,
        Err(AssignError::CapExceeded { count: 12, cap: 12, .. })
    ));
}

// ==========================================
// 测试 6: 日与岗位边界
// ==========================================

#[test]
fn test_integration_month_and_slot_boundaries() {
    // 闰年 2 月有 29 日
    let leap = MonthKey::new(2024, 2);
    let mut session = open_session(Operation::Pmf, CombinedSchedules::new(leap));
    session.try_assign(29, 0, Some("MUNIZ".to_string())).unwrap();
    let result = session.try_assign(30, 0, Some("MUNIZ".to_string()));
    assert!(matches!(
        result,
        Err(AssignError::InvalidDay { day: 30, days_in_month: 29, .. })
    ));

    // 平年 2 月只有 28 日
    let plain = MonthKey::new(2025, 2);
    let mut session = open_session(Operation::Pmf, CombinedSchedules::new(plain));
    let result = session.try_assign(29, 0, Some("MUNIZ".to_string()));
    assert!(matches!(
        result,
        Err(AssignError::InvalidDay { day: 29, days_in_month: 28, .. })
    ));

    // 岗位序号越界按勤务各自的岗位数判定
    let mut pmf = open_session(Operation::Pmf, CombinedSchedules::new(march()));
    assert!(matches!(
        pmf.try_assign(1, 3, Some("MUNIZ".to_string())),
        Err(AssignError::InvalidSlotIndex { slot_count: 3, .. })
    ));
    let mut transito = open_session(Operation::Transito, CombinedSchedules::new(march()));
    assert!(matches!(
        transito.try_assign(1, 2, Some("MUNIZ".to_string())),
        Err(AssignError::InvalidSlotIndex { slot_count: 2, .. })
    ));
}
