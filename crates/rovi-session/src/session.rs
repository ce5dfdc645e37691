//! 会话管理与消息派发
//!
//! [`RobotSession`] 独占传输通道，把 advertise/connect 握手收敛为
//! 单个活动会话，并把每条入站消息派发给影子状态、感知追踪器或
//! 配对池之一。断开只有一条代码路径：无论是显式 `disconnect`、
//! 传输故障还是存活超时，都经由同一个 `tear_down`，保证影子状态
//! 与挂起回调必然被清算。

use crate::block_pool::{BlockConnectionState, BlockPool, PoolEffects};
use crate::completion::{CompletionCallback, CompletionLedger};
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::hooks::{HookId, SessionHook, SessionHooks};
use crate::lights::LightEngine;
use crate::metrics::SessionMetrics;
use crate::objects::{ObjectTracker, Observation};
use crate::shadow::RobotShadow;
use rovi_link::Channel;
use rovi_protocol::{
    ActionKind, BACKPACK_LIGHT_COUNT, CLIENT_PROTOCOL_VERSION, CUBE_LIGHT_COUNT, ClientMessage,
    FactoryId, HEAD_ANGLE_TOLERANCE_RAD, LIFT_CARRY_HEIGHT_MM, LIFT_HEIGHT_MIN_MM,
    LIFT_TOLERANCE_MM, LightValue, ObjectFamily, ObjectId, Pose, RobotId, RobotMessage,
    StateUpdate, head_factor_to_rad, lift_factor_to_mm,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, trace, warn};

// 命令的默认运动参数（机器人固件侧仍会做限幅）
const DEFAULT_TURN_SPEED_RAD_S: f32 = 1.5;
const DEFAULT_WHEEL_ACCEL_MM_S2: f32 = 200.0;
const DEFAULT_HEAD_SPEED_RAD_S: f32 = 2.0;
const DEFAULT_HEAD_ACCEL_RAD_S2: f32 = 10.0;
const DEFAULT_LIFT_SPEED_MM_S: f32 = 100.0;
const DEFAULT_LIFT_ACCEL_MM_S2: f32 = 400.0;

/// 连接状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    /// 握手已发出，等待应答
    Connecting,
    Connected,
}

/// 断开原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    /// 调用方显式断开
    Requested,
    /// 机器人主动关闭会话
    TransportClosed,
    /// 传输层致命错误
    TransportError,
    /// 存活超时（超过窗口没有任何入站消息）
    LivenessTimeout,
    /// 握手被拒绝
    ConnectRejected,
}

/// 会话事件（经由 [`crate::hooks::SessionHooks`] 分发）
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// 握手完成，会话建立
    Connected { robot_id: RobotId },
    /// 握手失败（被拒绝或超时）
    ConnectFailed,
    /// 会话结束
    Disconnected { reason: DisconnectReason },
    /// 收到首条状态消息，影子状态就绪
    RobotReady { robot_id: RobotId },
    /// 配对池可用条目数变化
    BlockPoolAvailabilityChanged { available: usize },
    /// 某配件的配对连接状态变化
    BlockConnectionChanged {
        factory_id: FactoryId,
        state: BlockConnectionState,
    },
}

/// 机器人会话（对外 API）
///
/// 在应用启动时显式构造一次，按引用传给需要它的组件——没有全局
/// 单例。宿主应用的义务：
///
/// - 每帧恰好调用一次 [`RobotSession::pump`]（灯光限频、忙冷却和
///   可见性衰减都依赖它）；
/// - 钩子注册/注销对称（`add_hook` 返回的 id 由注册方负责 `remove_hook`）；
/// - 所有读取到的状态都只在当前帧内有效。
pub struct RobotSession<C: Channel> {
    channel: C,
    config: SessionConfig,
    status: ConnectionStatus,
    /// 影子状态（首条状态消息到达时分配）
    shadow: Option<RobotShadow>,
    completions: CompletionLedger,
    objects: ObjectTracker,
    block_pool: BlockPool,
    lights: LightEngine,
    hooks: SessionHooks,
    pending_events: Vec<SessionEvent>,
    metrics: SessionMetrics,
    /// 最近一条入站消息的到达时刻（存活检测）
    last_inbound: Option<Instant>,
    /// 本地忙冷却的截止时刻
    busy_until: Option<Instant>,
    busy_override: bool,
    /// 最近一次头部角度请求（目标弧度 + 时刻），用于重复请求抑制
    last_head_request: Option<(f32, Instant)>,
}

impl<C: Channel> RobotSession<C> {
    pub fn new(channel: C, config: SessionConfig) -> Self {
        Self {
            channel,
            config,
            status: ConnectionStatus::Disconnected,
            shadow: None,
            completions: CompletionLedger::new(),
            objects: ObjectTracker::new(),
            block_pool: BlockPool::new(),
            lights: LightEngine::new(),
            hooks: SessionHooks::new(),
            pending_events: Vec::new(),
            metrics: SessionMetrics::default(),
            last_inbound: None,
            busy_until: None,
            busy_override: false,
            last_head_request: None,
        }
    }

    // ============================================================
    // 连接生命周期
    // ============================================================

    /// 发起握手
    ///
    /// 异步完成：结果经由 [`SessionEvent::Connected`] /
    /// [`SessionEvent::ConnectFailed`] 通知。
    pub fn connect(&mut self) -> Result<(), SessionError> {
        if self.status != ConnectionStatus::Disconnected {
            return Err(SessionError::AlreadyConnected);
        }
        self.channel.send(&ClientMessage::ConnectRequest {
            client_version: CLIENT_PROTOCOL_VERSION,
        })?;
        self.metrics.tx_messages += 1;
        self.status = ConnectionStatus::Connecting;
        // 握手也受存活超时约束
        self.last_inbound = Some(Instant::now());
        info!("Connect request sent");
        Ok(())
    }

    /// 断开会话（幂等）
    ///
    /// 断开前强制同步 flush 一次熄灭的灯光状态，保证机器人不会
    /// 带着残留灯效失联。
    pub fn disconnect(&mut self) {
        match self.status {
            ConnectionStatus::Disconnected => {},
            ConnectionStatus::Connecting => {
                self.tear_down(DisconnectReason::Requested);
            },
            ConnectionStatus::Connected => {
                self.lights.all_off();
                let messages =
                    self.lights
                        .flush(Instant::now(), self.config.light_flush_interval, true);
                for msg in messages {
                    self.send_message(&msg);
                }
                self.send_message(&ClientMessage::Disconnect);
                self.tear_down(DisconnectReason::Requested);
            },
        }
        self.deliver_events();
    }

    /// 每帧主入口
    ///
    /// 依次：排空入站消息并派发 → 存活检测 → 忙冷却回收 →
    /// 可见性衰减 → 灯光差分批量发送 → 分发排队事件。
    pub fn pump(&mut self) {
        self.pump_at(Instant::now());
    }

    /// 以显式时刻驱动的 pump（嵌入方自带时钟或测试时使用）
    pub fn pump_at(&mut self, now: Instant) {
        if self.status != ConnectionStatus::Disconnected {
            self.drain_inbound(now);
        }

        if self.status != ConnectionStatus::Disconnected
            && let Some(last) = self.last_inbound
            && now.saturating_duration_since(last) > self.config.liveness_timeout
        {
            warn!(
                "No inbound message within {:?}, tearing session down",
                self.config.liveness_timeout
            );
            self.tear_down(DisconnectReason::LivenessTimeout);
        }

        if let Some(until) = self.busy_until
            && now >= until
        {
            self.busy_until = None;
        }

        self.objects.prune_stale_visible(now, self.config.visibility_window);

        if self.status == ConnectionStatus::Connected {
            let messages = self.lights.flush(now, self.config.light_flush_interval, false);
            if !messages.is_empty() {
                self.metrics.light_flushes += 1;
            }
            for msg in messages {
                self.send_message(&msg);
            }
        }

        self.deliver_events();
    }

    fn drain_inbound(&mut self, now: Instant) {
        loop {
            match self.channel.try_receive() {
                Ok(Some(msg)) => {
                    self.last_inbound = Some(now);
                    self.metrics.rx_messages += 1;
                    self.dispatch(msg, now);
                    if self.status == ConnectionStatus::Disconnected {
                        // 派发过程中会话被拆除（Goodbye 等）
                        break;
                    }
                },
                Ok(None) => break,
                Err(e) if e.is_fatal() => {
                    error!("Transport failure: {}", e);
                    self.tear_down(DisconnectReason::TransportError);
                    break;
                },
                Err(e) => {
                    // 未知标签/畸形报文：协议前后版本偏差是预期情况，
                    // 丢弃本条继续排空
                    warn!("Dropping undecodable datagram: {}", e);
                    self.metrics.rx_decode_errors += 1;
                },
            }
        }
    }

    /// 入站消息派发（标签联合的穷尽匹配）
    fn dispatch(&mut self, msg: RobotMessage, now: Instant) {
        trace!("Dispatching {}", msg.tag_name());
        match msg {
            RobotMessage::ConnectResponse { accepted, robot_id } => {
                self.on_connect_response(accepted, robot_id);
            },
            RobotMessage::State(update) => self.on_state(update),
            RobotMessage::ActionCompleted { kind, success } => {
                self.on_action_completed(kind, success);
            },
            RobotMessage::ObjectObserved {
                object_id,
                object_type,
                pose,
                rect,
                markers_visible,
            } => {
                self.objects.observe(
                    Observation {
                        object_id,
                        object_type,
                        pose,
                        rect,
                        markers_visible,
                    },
                    now,
                );
                // 方块的标识同时参与灯光差分层
                if object_type.family() == ObjectFamily::LightCube {
                    self.lights.ensure_cube(object_id);
                }
            },
            RobotMessage::ObjectMoved { object_id } => self.objects.mark_moved(object_id),
            RobotMessage::ObjectPoseUnknown { object_id }
            | RobotMessage::ObjectDeleted { object_id } => self.objects.remove(object_id),
            RobotMessage::ObjectAvailable {
                factory_id,
                object_type,
                rssi,
            } => {
                let effects = self.block_pool.on_advertisement(factory_id, object_type, rssi);
                self.apply_pool_effects(effects);
            },
            RobotMessage::ObjectUnavailable { factory_id } => {
                let effects = self.block_pool.on_lost(&factory_id);
                self.apply_pool_effects(effects);
            },
            RobotMessage::ObjectConnectionState {
                factory_id,
                object_type,
                object_id,
                connected,
            } => {
                let effects = self.block_pool.on_connection_state(
                    factory_id,
                    object_type,
                    object_id.option(),
                    connected,
                );
                self.apply_pool_effects(effects);
            },
            RobotMessage::Goodbye => {
                info!("Robot closed the session");
                self.tear_down(DisconnectReason::TransportClosed);
            },
        }
    }

    fn on_connect_response(&mut self, accepted: bool, robot_id: RobotId) {
        if self.status != ConnectionStatus::Connecting {
            warn!("Stray ConnectResponse while {:?}", self.status);
            return;
        }
        if accepted {
            info!("Session established with robot {:?}", robot_id);
            self.status = ConnectionStatus::Connected;
            self.push_event(SessionEvent::Connected { robot_id });
        } else {
            warn!("Robot rejected connection");
            self.tear_down(DisconnectReason::ConnectRejected);
        }
    }

    fn on_state(&mut self, update: StateUpdate) {
        if self.status != ConnectionStatus::Connected {
            // 机器人广播可能先于握手应答到达
            trace!("State update before session established, ignoring");
            return;
        }
        if self.shadow.is_none() {
            // 会话建立后的首条状态消息：一次性的"机器人就绪"信号
            info!("Robot {:?} reported first state", update.robot_id);
            self.shadow = Some(RobotShadow::new(update.robot_id));
            self.push_event(SessionEvent::RobotReady {
                robot_id: update.robot_id,
            });
        }
        if let Some(shadow) = &mut self.shadow {
            shadow.apply(&update);
        }
    }

    fn on_action_completed(&mut self, kind: ActionKind, success: bool) {
        if self.completions.resolve(kind, success) {
            self.metrics.completions_resolved += 1;
        } else {
            // 无挂起回调的完成通知：静默吸收
            trace!("Completion for {:?} with no pending callback", kind);
            self.metrics.completions_orphaned += 1;
        }
        if !success {
            // 防御性恢复：动作失败后把举升臂收回确定高度，
            // 避免物理举升悬在动作序列中间
            debug!("Action {:?} failed, issuing corrective lift height", kind);
            self.recover_lift();
        }
    }

    /// 唯一的断开路径
    fn tear_down(&mut self, reason: DisconnectReason) {
        if self.status == ConnectionStatus::Disconnected {
            return;
        }
        let was_connecting = self.status == ConnectionStatus::Connecting;
        info!("Session torn down: {:?}", reason);
        self.status = ConnectionStatus::Disconnected;
        self.shadow = None;

        // 挂起回调整体清算为失败：调用方不会泄漏等待状态
        let failed = self.completions.fail_all();
        if failed > 0 {
            debug!("Force-failed {} pending completion(s)", failed);
            self.metrics.completions_force_failed += failed as u64;
        }

        self.objects.clear();
        self.block_pool.clear();
        self.lights.reset();
        self.busy_until = None;
        self.busy_override = false;
        self.last_head_request = None;
        self.last_inbound = None;

        if was_connecting {
            self.push_event(SessionEvent::ConnectFailed);
        } else {
            self.push_event(SessionEvent::Disconnected { reason });
        }
    }

    // ============================================================
    // 出站发送
    // ============================================================

    /// 发送一条消息（防御性兜底：未连接时记警告并丢弃）
    ///
    /// 调用方应自行检查连接状态；这里的静默失败只是避免一处疏忽
    /// 拖垮整个派发循环。
    fn send_message(&mut self, msg: &ClientMessage) -> bool {
        if self.status != ConnectionStatus::Connected {
            warn!("Dropping {} while not connected", msg.tag_name());
            self.metrics.tx_dropped_not_connected += 1;
            return false;
        }
        match self.channel.send(msg) {
            Ok(()) => {
                self.metrics.tx_messages += 1;
                true
            },
            Err(e) if e.is_fatal() => {
                error!("Transport failure while sending {}: {}", msg.tag_name(), e);
                self.tear_down(DisconnectReason::TransportError);
                false
            },
            Err(e) => {
                warn!("Failed to send {}: {}", msg.tag_name(), e);
                false
            },
        }
    }

    /// 发送命令并登记完成回调/忙冷却
    ///
    /// 发送失败（含未连接被丢弃）时不会有完成通知到达，已提供的
    /// 回调立即以失败结算。
    fn send_command(
        &mut self,
        msg: ClientMessage,
        on_complete: Option<CompletionCallback>,
        cooldown: bool,
    ) {
        let kind = msg.action_kind();
        if !self.send_message(&msg) {
            if let Some(callback) = on_complete {
                callback(false);
            }
            return;
        }
        if let Some(kind) = kind
            && let Some(callback) = on_complete
        {
            self.completions.push(kind, callback);
        }
        if cooldown {
            self.busy_until = Some(Instant::now() + self.config.action_cooldown);
        }
    }

    /// 动作失败后的纠正性举升：携带中回到携带高度，否则归零
    fn recover_lift(&mut self) {
        let height_mm = match &self.shadow {
            Some(shadow) if shadow.is_carrying() => LIFT_CARRY_HEIGHT_MM,
            _ => LIFT_HEIGHT_MIN_MM,
        };
        // 不登记回调：孤儿完成通知会被账本吸收
        self.send_message(&ClientMessage::SetLiftHeight {
            height_mm,
            max_speed_mm_per_sec: DEFAULT_LIFT_SPEED_MM_S,
            accel_mm_per_sec2: DEFAULT_LIFT_ACCEL_MM_S2,
        });
    }

    // ============================================================
    // 命令操作
    // ============================================================

    /// 轮速驱动（无完成语义）
    ///
    /// "忙"状态下照常发送——是否尊重 [`RobotSession::is_busy`] 是
    /// 调用方的责任，本层不做排队或拒绝。
    pub fn drive_wheels(&mut self, left_mmps: f32, right_mmps: f32) {
        self.send_command(
            ClientMessage::DriveWheels {
                left_mmps,
                right_mmps,
                left_accel_mmps2: DEFAULT_WHEEL_ACCEL_MM_S2,
                right_accel_mmps2: DEFAULT_WHEEL_ACCEL_MM_S2,
            },
            None,
            false,
        );
    }

    /// 原地转体指定角度
    pub fn turn_in_place(&mut self, angle_rad: f32, on_complete: Option<CompletionCallback>) {
        self.send_command(
            ClientMessage::TurnInPlace {
                angle_rad,
                speed_rad_per_sec: DEFAULT_TURN_SPEED_RAD_S,
            },
            on_complete,
            true,
        );
    }

    /// 拾取指定对象
    pub fn pick_up_object(&mut self, object_id: ObjectId, on_complete: Option<CompletionCallback>) {
        self.send_command(ClientMessage::PickUpObject { object_id }, on_complete, true);
    }

    /// 把携带的对象放到地面
    pub fn place_object_on_ground(&mut self, on_complete: Option<CompletionCallback>) {
        self.send_command(ClientMessage::PlaceObjectOnGround, on_complete, true);
    }

    /// 把携带的对象放到目标对象上
    pub fn place_on_object(&mut self, target_id: ObjectId, on_complete: Option<CompletionCallback>) {
        self.send_command(ClientMessage::PlaceOnObject { target_id }, on_complete, true);
    }

    /// 推翻/滚动指定方块
    pub fn roll_object(&mut self, object_id: ObjectId, on_complete: Option<CompletionCallback>) {
        self.send_command(ClientMessage::RollObject { object_id }, on_complete, true);
    }

    /// 行驶到世界坐标位姿
    pub fn goto_pose(&mut self, pose: Pose, on_complete: Option<CompletionCallback>) {
        self.send_command(ClientMessage::GotoPose { pose }, on_complete, true);
    }

    /// 行驶到对象附近
    pub fn goto_object(
        &mut self,
        object_id: ObjectId,
        distance_mm: f32,
        on_complete: Option<CompletionCallback>,
    ) {
        self.send_command(
            ClientMessage::GotoObject {
                object_id,
                distance_mm,
            },
            on_complete,
            true,
        );
    }

    /// 播放动画
    pub fn play_animation(
        &mut self,
        name: &str,
        loops: u32,
        on_complete: Option<CompletionCallback>,
    ) {
        self.send_command(
            ClientMessage::PlayAnimation {
                name: name.to_string(),
                loops,
            },
            on_complete,
            true,
        );
    }

    /// 取消当前动作
    ///
    /// 不丢弃挂起回调：被取消动作的完成通知仍会（通常以失败）
    /// 正常到达并按 FIFO 结算。
    pub fn cancel_action(&mut self) {
        self.send_command(ClientMessage::CancelAction, None, false);
    }

    /// 开关空闲自主行为
    pub fn set_idle_animation_enabled(&mut self, enabled: bool) {
        self.send_command(
            ClientMessage::SetIdleAnimationEnabled { enabled },
            None,
            false,
        );
    }

    /// 设置头部俯仰（归一化系数 [-1, 1]）
    ///
    /// 相同目标角的无回调请求在最小重发间隔内被抑制。
    pub fn set_head_angle(&mut self, factor: f32, on_complete: Option<CompletionCallback>) {
        let now = Instant::now();
        let angle_rad = head_factor_to_rad(factor);

        if on_complete.is_none()
            && let Some((last_rad, at)) = self.last_head_request
            && now.saturating_duration_since(at) < self.config.head_rerequest_interval
            && (angle_rad - last_rad).abs() < HEAD_ANGLE_TOLERANCE_RAD
        {
            trace!("Suppressing duplicate head angle request ({:.3} rad)", angle_rad);
            self.metrics.tx_suppressed += 1;
            return;
        }

        self.last_head_request = Some((angle_rad, now));
        self.send_command(
            ClientMessage::SetHeadAngle {
                angle_rad,
                max_speed_rad_per_sec: DEFAULT_HEAD_SPEED_RAD_S,
                accel_rad_per_sec2: DEFAULT_HEAD_ACCEL_RAD_S2,
            },
            on_complete,
            false,
        );
    }

    /// 设置举升高度（归一化系数 [0, 1]）
    ///
    /// 已在目标高度容差内且无回调的空操作请求被抑制。
    pub fn set_lift_height(&mut self, factor: f32, on_complete: Option<CompletionCallback>) {
        let height_mm = lift_factor_to_mm(factor);

        if on_complete.is_none()
            && let Some(shadow) = &self.shadow
            && (shadow.lift_height_mm - height_mm).abs() < LIFT_TOLERANCE_MM
        {
            trace!("Suppressing no-op lift request ({:.1} mm)", height_mm);
            self.metrics.tx_suppressed += 1;
            return;
        }

        self.send_command(
            ClientMessage::SetLiftHeight {
                height_mm,
                max_speed_mm_per_sec: DEFAULT_LIFT_SPEED_MM_S,
                accel_mm_per_sec2: DEFAULT_LIFT_ACCEL_MM_S2,
            },
            on_complete,
            false,
        );
    }

    // ============================================================
    // 灯光
    // ============================================================

    /// 设置单个背部灯位的期望值（发送由 pump 限频批量完成）
    pub fn set_backpack_light(&mut self, index: usize, value: LightValue) {
        if !self.lights.set_backpack_light(index, value) {
            warn!("Backpack light index {} out of range", index);
        }
    }

    /// 设置全部背部灯位的期望值
    pub fn set_backpack_lights(&mut self, lights: [LightValue; BACKPACK_LIGHT_COUNT]) {
        self.lights.set_backpack_lights(lights);
    }

    /// 设置指定方块全部灯位的期望值
    pub fn set_cube_lights(&mut self, object_id: ObjectId, lights: [LightValue; CUBE_LIGHT_COUNT]) {
        if !self.lights.set_cube_lights(object_id, lights) {
            warn!("Cube {:?} has no light bank (never observed)", object_id);
        }
    }

    // ============================================================
    // 配对池
    // ============================================================

    /// 开关配对池发现（幂等请求）
    pub fn enable_block_pool(&mut self, enabled: bool, discovery_window_s: f32) {
        if let Some(msg) = self.block_pool.enable(enabled, discovery_window_s) {
            self.send_message(&msg);
        }
    }

    /// 配对意图：把指定配件连入/移出配对池
    ///
    /// 这是请求而非状态改变；确认经由入站连接状态消息到达。
    pub fn set_object_in_pool(&mut self, factory_id: &FactoryId, connect: bool) {
        let effects = self.block_pool.set_object_in_pool(factory_id, connect);
        self.apply_pool_effects(effects);
    }

    fn apply_pool_effects(&mut self, effects: PoolEffects) {
        if let Some(msg) = effects.outbound {
            self.send_message(&msg);
        }
        if let Some((factory_id, state)) = effects.connection_changed {
            self.push_event(SessionEvent::BlockConnectionChanged { factory_id, state });
        }
        if effects.availability_changed {
            self.push_event(SessionEvent::BlockPoolAvailabilityChanged {
                available: self.block_pool.available_count(),
            });
        }
    }

    // ============================================================
    // 事件钩子
    // ============================================================

    /// 注册事件钩子，返回用于注销的句柄
    pub fn add_hook(&mut self, hook: Arc<dyn SessionHook>) -> HookId {
        self.hooks.add(hook)
    }

    /// 注销事件钩子
    ///
    /// 未知 id 记警告（注册/注销不对称是调用方缺陷），但绝不中断
    /// 派发循环。
    pub fn remove_hook(&mut self, id: HookId) {
        if !self.hooks.remove(id) {
            warn!("remove_hook: unknown hook id {:?}", id);
        }
    }

    fn push_event(&mut self, event: SessionEvent) {
        self.pending_events.push(event);
    }

    /// 延迟分发：事件在消息处理期间排队，处理结束后统一送出
    fn deliver_events(&mut self) {
        if self.pending_events.is_empty() {
            return;
        }
        let events = std::mem::take(&mut self.pending_events);
        for event in &events {
            self.hooks.dispatch(event);
        }
    }

    // ============================================================
    // 只读状态
    // ============================================================

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }

    /// 影子状态（首条状态消息前为 `None`；仅本帧内有效的快照视图）
    pub fn robot(&self) -> Option<&RobotShadow> {
        self.shadow.as_ref()
    }

    /// 感知对象集合
    pub fn objects(&self) -> &ObjectTracker {
        &self.objects
    }

    /// 配对池
    pub fn block_pool(&self) -> &BlockPool {
        &self.block_pool
    }

    /// 是否"忙"
    ///
    /// 仅供参考：下一帧就可能改变，不能当锁用。为真的条件：本地
    /// 覆盖开启、忙冷却未到期，或状态位中存在寻路/非空闲动画/
    /// 被拿起任意一项。
    pub fn is_busy(&self) -> bool {
        self.is_busy_at(Instant::now())
    }

    pub fn is_busy_at(&self, now: Instant) -> bool {
        if self.busy_override {
            return true;
        }
        if let Some(until) = self.busy_until
            && now < until
        {
            return true;
        }
        match &self.shadow {
            Some(shadow) => {
                shadow.status.is_pathing()
                    || (shadow.status.is_animating() && !shadow.status.is_animating_idle())
                    || shadow.status.is_picked_up()
            },
            None => false,
        }
    }

    /// 本地"忙"覆盖开关（UI 在本地动画期间置位）
    pub fn set_busy_override(&mut self, busy: bool) {
        self.busy_override = busy;
    }

    /// 指标快照
    pub fn metrics(&self) -> SessionMetrics {
        self.metrics
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}
